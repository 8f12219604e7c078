//! "Version Update Notes" section for skill documents

use crate::domain::AcceptedUpdate;
use chrono::NaiveDate;

/// Start of the notes section; everything from here to the end of the document is replaced
pub const NOTES_MARKER: &str = "\n---\n\n## Version Update Notes";

/// Render the notes section for a set of applied updates
pub fn render_notes(updates: &[AcceptedUpdate], today: NaiveDate) -> String {
    let mut section = format!(
        "{}\n\n*Last checked: {}*\n\n",
        NOTES_MARKER,
        today.format("%Y-%m-%d")
    );
    for update in updates {
        section.push_str(&format!(
            "### {} {} -> {}\n\n",
            update.name, update.old_version, update.new_version
        ));
        if update.docs_url.is_empty() {
            section.push_str("No documentation link recorded.\n\n");
        } else {
            section.push_str(&format!("See: {}\n\n", update.docs_url));
        }
    }
    section
}

/// Drop any existing notes section and append `section` (if non-empty)
pub fn replace_notes(content: &str, section: &str) -> String {
    let body = match content.find(NOTES_MARKER) {
        Some(index) => &content[..index],
        None => content,
    };
    format!("{}{}", body, section)
}
