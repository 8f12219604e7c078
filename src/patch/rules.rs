//! Patch rules
//!
//! Every rule is anchored on the package name, never on the version string
//! alone, so patching one package cannot touch text that belongs to another
//! package with the same version. Rules only rewrite occurrences of the old
//! version, so a second application of the same update is a no-op.

use crate::domain::AcceptedUpdate;
use regex::{Captures, Regex};

/// Result of applying a rule to a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Patched text
    pub content: String,
    /// Number of occurrences rewritten
    pub replacements: usize,
}

impl RuleOutcome {
    fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            replacements: 0,
        }
    }
}

/// A context in which a version string is recognized as belonging to a package
pub trait PatchRule: Send + Sync {
    /// Short rule name for logs
    fn name(&self) -> &'static str;

    /// Rewrite every occurrence of `update` in this rule's context
    fn apply(&self, content: &str, update: &AcceptedUpdate) -> RuleOutcome;
}

/// Markdown table rows: `| <name> | <old> |` becomes `| <name> | <new> |`
///
/// The name must fill its whole cell and the version must fill the next one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableRowRule;

impl PatchRule for TableRowRule {
    fn name(&self) -> &'static str {
        "table-row"
    }

    fn apply(&self, content: &str, update: &AcceptedUpdate) -> RuleOutcome {
        let pattern = format!(
            r"(\|[ \t]*{}[ \t]*\|[ \t]*){}([ \t]*\|)",
            regex::escape(&update.name),
            regex::escape(&update.old_version)
        );
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(package = %update.name, error = %e, "table-row pattern rejected");
                return RuleOutcome::unchanged(content);
            }
        };

        let mut replacements = 0;
        let patched = re.replace_all(content, |caps: &Captures| {
            replacements += 1;
            format!("{}{}{}", &caps[1], update.new_version, &caps[2])
        });

        RuleOutcome {
            content: patched.into_owned(),
            replacements,
        }
    }
}

/// Pinned references: `<name>@<old>` becomes `<name>@<new>` (CDN URLs, import specifiers)
#[derive(Debug, Default, Clone, Copy)]
pub struct PinnedReferenceRule;

impl PatchRule for PinnedReferenceRule {
    fn name(&self) -> &'static str {
        "pinned-reference"
    }

    fn apply(&self, content: &str, update: &AcceptedUpdate) -> RuleOutcome {
        replace_anchored(content, update, '@')
    }
}

/// Path segments: `<name>/<old>` becomes `<name>/<new>` (import maps, versioned paths)
#[derive(Debug, Default, Clone, Copy)]
pub struct PathSegmentRule;

impl PatchRule for PathSegmentRule {
    fn name(&self) -> &'static str {
        "path-segment"
    }

    fn apply(&self, content: &str, update: &AcceptedUpdate) -> RuleOutcome {
        replace_anchored(content, update, '/')
    }
}

/// The rules applied by default, in application order
pub fn default_rules() -> Vec<Box<dyn PatchRule>> {
    vec![
        Box::new(TableRowRule),
        Box::new(PinnedReferenceRule),
        Box::new(PathSegmentRule),
    ]
}

/// Characters that continue a package name
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// True when `before` ends in `@scope/`, i.e. the match is the tail of a scoped name
fn is_scope_member(before: &str) -> bool {
    let Some(rest) = before.strip_suffix('/') else {
        return false;
    };
    let segment = rest
        .rsplit(|c: char| !is_name_char(c) && c != '@')
        .next()
        .unwrap_or("");
    segment.len() > 1 && segment.starts_with('@')
}

/// The name must not be the tail of a longer name
fn left_boundary(before: &str) -> bool {
    match before.chars().next_back() {
        None => true,
        Some(c) if is_name_char(c) => false,
        Some('/') => !is_scope_member(before),
        Some(_) => true,
    }
}

/// The version must not be the head of a longer version
fn right_boundary(after: &str) -> bool {
    let mut chars = after.chars();
    match chars.next() {
        None => true,
        Some(c) if c.is_ascii_alphanumeric() => false,
        Some('.' | '-' | '+' | '_') => !chars.next().is_some_and(|c| c.is_ascii_alphanumeric()),
        Some(_) => true,
    }
}

fn replace_anchored(content: &str, update: &AcceptedUpdate, separator: char) -> RuleOutcome {
    let needle = format!("{}{}{}", update.name, separator, update.old_version);
    let replacement = format!("{}{}{}", update.name, separator, update.new_version);

    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    let mut replacements = 0;

    for (start, _) in content.match_indices(&needle) {
        let end = start + needle.len();
        if !left_boundary(&content[..start]) || !right_boundary(&content[end..]) {
            continue;
        }
        out.push_str(&content[last..start]);
        out.push_str(&replacement);
        last = end;
        replacements += 1;
    }

    if replacements == 0 {
        return RuleOutcome::unchanged(content);
    }

    out.push_str(&content[last..]);
    RuleOutcome {
        content: out,
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn react() -> AcceptedUpdate {
        AcceptedUpdate::new("react", "18.2.0", "18.3.0")
    }

    // ---- table rows ----

    #[test]
    fn test_table_row_basic() {
        let out = TableRowRule.apply("| react | 18.2.0 | UI library |\n", &react());
        assert_eq!(out.content, "| react | 18.3.0 | UI library |\n");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_table_row_flexible_spacing() {
        let out = TableRowRule.apply("|react|18.2.0|x|\n|  react  |  18.2.0  |\n", &react());
        assert_eq!(out.content, "|react|18.3.0|x|\n|  react  |  18.3.0  |\n");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_table_row_exact_name() {
        let doc = "| preact | 18.2.0 |\n| react-dom | 18.2.0 |\n";
        let out = TableRowRule.apply(doc, &react());
        assert_eq!(out.content, doc);
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn test_table_row_exact_version() {
        let doc = "| react | 18.2.0-rc |\n| react | 18.2.01 |\n";
        let out = TableRowRule.apply(doc, &react());
        assert_eq!(out.content, doc);
    }

    #[test]
    fn test_table_row_does_not_span_lines() {
        let doc = "| react |\n| 18.2.0 |\n";
        assert_eq!(TableRowRule.apply(doc, &react()).content, doc);
    }

    #[test]
    fn test_table_row_regex_metacharacters_in_name() {
        let update = AcceptedUpdate::new("c++ (gcc)", "1.0", "1.1");
        let out = TableRowRule.apply("| c++ (gcc) | 1.0 |\n| cxx (gcc) | 1.0 |\n", &update);
        assert_eq!(out.content, "| c++ (gcc) | 1.1 |\n| cxx (gcc) | 1.0 |\n");
    }

    #[test]
    fn test_table_row_dollar_in_new_version_is_literal() {
        let update = AcceptedUpdate::new("react", "18.2.0", "$1");
        let out = TableRowRule.apply("| react | 18.2.0 |", &update);
        assert_eq!(out.content, "| react | $1 |");
    }

    // ---- pinned references ----

    #[test]
    fn test_pinned_cdn_url() {
        let doc = "<script src=\"https://unpkg.com/react@18.2.0/umd/react.production.min.js\"></script>";
        let out = PinnedReferenceRule.apply(doc, &react());
        assert_eq!(
            out.content,
            "<script src=\"https://unpkg.com/react@18.3.0/umd/react.production.min.js\"></script>"
        );
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_pinned_import_specifier_and_sentence_end() {
        let out = PinnedReferenceRule.apply("npm i react@18.2.0. Then import 'react@18.2.0'", &react());
        assert_eq!(out.content, "npm i react@18.3.0. Then import 'react@18.3.0'");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_pinned_requires_exact_name() {
        let doc = "preact@18.2.0 my_react@18.2.0 @types/react@18.2.0 react-dom@18.2.0";
        let out = PinnedReferenceRule.apply(doc, &react());
        assert_eq!(out.content, doc);
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn test_pinned_requires_whole_version() {
        let doc = "react@18.2.0-canary react@18.2.01 react@18.2.0.1";
        assert_eq!(PinnedReferenceRule.apply(doc, &react()).content, doc);
    }

    #[test]
    fn test_pinned_scoped_package() {
        let update = AcceptedUpdate::new("@tanstack/react-query", "5.0.0", "5.1.0");
        let doc = "https://esm.sh/@tanstack/react-query@5.0.0 and @tanstack/react-query@5.0.0";
        let out = PinnedReferenceRule.apply(doc, &update);
        assert_eq!(
            out.content,
            "https://esm.sh/@tanstack/react-query@5.1.0 and @tanstack/react-query@5.1.0"
        );
    }

    #[test]
    fn test_pinned_idempotent_when_new_extends_old() {
        let update = AcceptedUpdate::new("vite", "5.0", "5.0.1");
        let once = PinnedReferenceRule.apply("vite@5.0", &update);
        assert_eq!(once.content, "vite@5.0.1");
        let twice = PinnedReferenceRule.apply(&once.content, &update);
        assert_eq!(twice.content, "vite@5.0.1");
        assert_eq!(twice.replacements, 0);
    }

    // ---- path segments ----

    #[test]
    fn test_path_segment() {
        let doc = r#"{"imports": {"react": "https://cdn.example.com/react/18.2.0/index.js"}}"#;
        let out = PathSegmentRule.apply(doc, &react());
        assert_eq!(
            out.content,
            r#"{"imports": {"react": "https://cdn.example.com/react/18.3.0/index.js"}}"#
        );
    }

    #[test]
    fn test_path_segment_isolated_from_other_names() {
        let doc = "libs/preact/18.2.0 libs/@types/react/18.2.0";
        assert_eq!(PathSegmentRule.apply(doc, &react()).content, doc);
    }

    #[test]
    fn test_path_segment_idempotent_when_new_extends_old() {
        let update = AcceptedUpdate::new("django", "5.1", "5.1.4");
        let once = PathSegmentRule.apply("docs/django/5.1/", &update);
        assert_eq!(once.content, "docs/django/5.1.4/");
        let twice = PathSegmentRule.apply(&once.content, &update);
        assert_eq!(twice.content, once.content);
    }

    // ---- boundaries ----

    #[test]
    fn test_left_boundary() {
        assert!(left_boundary(""));
        assert!(left_boundary("https://unpkg.com/"));
        assert!(left_boundary("see "));
        assert!(!left_boundary("p"));
        assert!(!left_boundary("my-"));
        assert!(!left_boundary("npm/@types/"));
        assert!(!left_boundary("@types/"));
    }

    #[test]
    fn test_right_boundary() {
        assert!(right_boundary(""));
        assert!(right_boundary("/umd"));
        assert!(right_boundary(". Next"));
        assert!(right_boundary("\""));
        assert!(!right_boundary("1"));
        assert!(!right_boundary("-beta"));
        assert!(!right_boundary(".1"));
    }

    #[test]
    fn test_default_rules_order() {
        let names: Vec<_> = default_rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["table-row", "pinned-reference", "path-segment"]);
    }
}
