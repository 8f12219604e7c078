//! Interactive selection of updates
//!
//! Candidates are numbered from 1 across all records. A malformed subset
//! never yields a partial selection: any bad token empties the whole choice.

use super::input::InputSource;
use crate::domain::AcceptedUpdate;
use crate::error::SelectionError;

const CHOICE_PROMPT: &str = "\n  Choice [A/S/N]: ";
const NUMBERS_PROMPT: &str = "  Enter numbers (comma-separated, e.g. 1,3,5): ";

/// An update offered to (or accepted by) the user, tagged with its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUpdate {
    /// Skill name
    pub record: String,
    /// The update triple
    pub update: AcceptedUpdate,
}

impl SelectedUpdate {
    pub fn new(record: impl Into<String>, update: AcceptedUpdate) -> Self {
        Self {
            record: record.into(),
            update,
        }
    }
}

/// The user's decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Accept everything offered
    All,
    /// Accept nothing
    Nothing,
    /// Accept the listed 1-based indices, in the order given
    Indices(Vec<usize>),
    /// Malformed answer; accepts nothing
    Invalid(SelectionError),
}

impl Selection {
    /// Items accepted by this selection
    pub fn pick<T: Clone>(&self, items: &[T]) -> Vec<T> {
        match self {
            Selection::All => items.to_vec(),
            Selection::Nothing | Selection::Invalid(_) => Vec::new(),
            Selection::Indices(indices) => indices
                .iter()
                .filter_map(|i| i.checked_sub(1).and_then(|i| items.get(i)).cloned())
                .collect(),
        }
    }

    /// The error, if the answer was malformed
    pub fn error(&self) -> Option<&SelectionError> {
        match self {
            Selection::Invalid(e) => Some(e),
            _ => None,
        }
    }

    fn from_indices(parsed: Result<Vec<usize>, SelectionError>) -> Self {
        match parsed {
            Ok(indices) => Selection::Indices(indices),
            Err(e) => Selection::Invalid(e),
        }
    }
}

/// Parse a comma-separated list of 1-based indices, each in `1..=max`
///
/// Duplicates are collapsed, keeping the first occurrence.
pub fn parse_indices(input: &str, max: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut indices = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        let index: usize = token.parse().map_err(|_| SelectionError::NotANumber {
            token: token.to_string(),
        })?;
        if index == 0 || index > max {
            return Err(SelectionError::OutOfRange { index, max });
        }
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    Ok(indices)
}

/// Render the numbered list of offered updates and the options
pub fn render_menu(entries: &[SelectedUpdate]) -> String {
    let mut records: Vec<&str> = Vec::new();
    for entry in entries {
        if !records.contains(&entry.record.as_str()) {
            records.push(entry.record.as_str());
        }
    }

    let mut menu = format!(
        "\n  {} update(s) available across {} skill(s):\n\n",
        entries.len(),
        records.len()
    );

    let mut current: Option<&str> = None;
    for (i, entry) in entries.iter().enumerate() {
        if current != Some(entry.record.as_str()) {
            menu.push_str(&format!("    [{}]\n", entry.record));
            current = Some(entry.record.as_str());
        }
        menu.push_str(&format!(
            "      {}. {}: {} -> {}\n",
            i + 1,
            entry.update.name,
            entry.update.old_version,
            entry.update.new_version
        ));
    }

    menu.push_str("\n  Options:\n");
    menu.push_str("    [A] Update ALL to latest\n");
    menu.push_str("    [S] Select specific packages (by number)\n");
    menu.push_str("    [N] Skip updates\n");
    menu
}

/// Ask the user which of `entries` to accept
///
/// `A`, `all` or an empty answer accepts everything; `S` asks for numbers;
/// a bare number list is accepted directly; anything else accepts nothing.
pub fn prompt_selection(input: &mut dyn InputSource, entries: &[SelectedUpdate]) -> Selection {
    if entries.is_empty() {
        return Selection::Nothing;
    }

    let message = format!("{}{}", render_menu(entries), CHOICE_PROMPT);
    let answer = match input.prompt(&message) {
        Ok(Some(answer)) => answer,
        Ok(None) => return Selection::Nothing,
        Err(e) => {
            return Selection::Invalid(SelectionError::Io {
                message: e.to_string(),
            })
        }
    };

    let answer = answer.trim();
    match answer.to_ascii_lowercase().as_str() {
        "" | "a" | "all" => Selection::All,
        "n" | "none" => Selection::Nothing,
        "s" | "select" => match input.prompt(NUMBERS_PROMPT) {
            Ok(Some(list)) => Selection::from_indices(parse_indices(&list, entries.len())),
            Ok(None) => Selection::Invalid(SelectionError::Empty),
            Err(e) => Selection::Invalid(SelectionError::Io {
                message: e.to_string(),
            }),
        },
        _ if answer.starts_with(|c: char| c.is_ascii_digit()) => {
            Selection::from_indices(parse_indices(answer, entries.len()))
        }
        _ => Selection::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ScriptedInput;

    fn entries() -> Vec<SelectedUpdate> {
        vec![
            SelectedUpdate::new("react-skill", AcceptedUpdate::new("react", "18.2.0", "18.3.0")),
            SelectedUpdate::new("react-skill", AcceptedUpdate::new("vite", "5.0.0", "5.1.0")),
            SelectedUpdate::new("django-skill", AcceptedUpdate::new("Django", "5.1.4", "5.2.0")),
        ]
    }

    fn select(answers: &[&str]) -> Selection {
        let mut input = ScriptedInput::new(answers.iter().copied());
        prompt_selection(&mut input, &entries())
    }

    // ---- parse_indices ----

    #[test]
    fn test_parse_indices_valid() {
        assert_eq!(parse_indices("1,3", 3), Ok(vec![1, 3]));
        assert_eq!(parse_indices(" 2 , 1 ", 3), Ok(vec![2, 1]));
    }

    #[test]
    fn test_parse_indices_duplicates_collapsed() {
        assert_eq!(parse_indices("2,2,1,2", 3), Ok(vec![2, 1]));
    }

    #[test]
    fn test_parse_indices_non_numeric_rejects_everything() {
        assert_eq!(
            parse_indices("1,x,3", 3),
            Err(SelectionError::NotANumber {
                token: "x".to_string()
            })
        );
    }

    #[test]
    fn test_parse_indices_out_of_range() {
        assert_eq!(
            parse_indices("1,4", 3),
            Err(SelectionError::OutOfRange { index: 4, max: 3 })
        );
        assert_eq!(
            parse_indices("0", 3),
            Err(SelectionError::OutOfRange { index: 0, max: 3 })
        );
    }

    #[test]
    fn test_parse_indices_empty() {
        assert_eq!(parse_indices("   ", 3), Err(SelectionError::Empty));
        assert!(matches!(
            parse_indices("1,,2", 3),
            Err(SelectionError::NotANumber { .. })
        ));
    }

    // ---- pick ----

    #[test]
    fn test_pick() {
        let items = vec!['a', 'b', 'c'];
        assert_eq!(Selection::All.pick(&items), items);
        assert!(Selection::Nothing.pick(&items).is_empty());
        assert!(Selection::Invalid(SelectionError::Empty).pick(&items).is_empty());
        assert_eq!(Selection::Indices(vec![3, 1]).pick(&items), vec!['c', 'a']);
    }

    // ---- prompt_selection ----

    #[test]
    fn test_prompt_all_variants() {
        assert_eq!(select(&["A"]), Selection::All);
        assert_eq!(select(&["all"]), Selection::All);
        assert_eq!(select(&[""]), Selection::All);
    }

    #[test]
    fn test_prompt_none_variants() {
        assert_eq!(select(&["N"]), Selection::Nothing);
        assert_eq!(select(&["none"]), Selection::Nothing);
        assert_eq!(select(&["whatever"]), Selection::Nothing);
        assert_eq!(select(&[]), Selection::Nothing);
    }

    #[test]
    fn test_prompt_select_then_numbers() {
        assert_eq!(select(&["S", "1,3"]), Selection::Indices(vec![1, 3]));
    }

    #[test]
    fn test_prompt_bare_list() {
        assert_eq!(select(&["2"]), Selection::Indices(vec![2]));
    }

    #[test]
    fn test_prompt_invalid_list_is_fail_safe() {
        let selection = select(&["1,x,3"]);
        assert!(selection.error().is_some());
        assert!(selection.pick(&entries()).is_empty());

        let selection = select(&["s", "1,x,3"]);
        assert!(selection.pick(&entries()).is_empty());
    }

    #[test]
    fn test_prompt_select_without_numbers() {
        assert_eq!(select(&["s"]), Selection::Invalid(SelectionError::Empty));
    }

    #[test]
    fn test_prompt_no_entries_asks_nothing() {
        let mut input = ScriptedInput::new(["a"]);
        assert_eq!(prompt_selection(&mut input, &[]), Selection::Nothing);
        assert!(input.prompts().is_empty());
    }

    #[test]
    fn test_render_menu() {
        let menu = render_menu(&entries());
        assert!(menu.contains("3 update(s) available across 2 skill(s)"));
        assert!(menu.contains("    [react-skill]\n      1. react: 18.2.0 -> 18.3.0\n      2. vite: 5.0.0 -> 5.1.0\n"));
        assert!(menu.contains("    [django-skill]\n      3. Django: 5.1.4 -> 5.2.0\n"));
        assert!(menu.contains("[A] Update ALL to latest"));
    }
}
