//! Version ordering for tracked and published version strings
//!
//! Versions are split on `.`; every all-digit component is compared as an
//! integer of any width, everything else is kept as text. Two sequences are
//! ordered like tuples: the first differing position decides, and when one
//! sequence is a prefix of the other the shorter one is smaller, so
//! `1.2 < 1.2.0`. An integer and a text component at the deciding position
//! have no defined order; `is_newer` then falls back to plain inequality.

use std::cmp::Ordering;
use std::fmt;

/// One dot-separated component of a version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPart {
    /// All-digit component, stored without leading zeros
    Number(String),
    /// Any other component, kept verbatim
    Text(String),
}

impl VersionPart {
    fn parse(component: &str) -> Self {
        let trimmed = component.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let significant = digits.trim_start_matches('0');
            let normalized = if significant.is_empty() { "0" } else { significant };
            VersionPart::Number(normalized.to_string())
        } else {
            VersionPart::Text(component.to_string())
        }
    }

    /// Creates a numeric part from an integer
    pub fn number(n: u64) -> Self {
        VersionPart::Number(n.to_string())
    }

    /// Compares two parts of the same kind; `None` for integer vs text
    fn try_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            // Normalized digit strings: longer is larger, equal length compares lexically
            (VersionPart::Number(a), VersionPart::Number(b)) => {
                Some(a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            }
            (VersionPart::Text(a), VersionPart::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPart::Number(n) => write!(f, "{}", n),
            VersionPart::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Splits a version string into its components
pub fn parse_version(version: &str) -> Vec<VersionPart> {
    version.split('.').map(VersionPart::parse).collect()
}

/// Orders two version strings component by component
///
/// Returns `None` when the first differing position holds an integer on one
/// side and text on the other.
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let parts_a = parse_version(a);
    let parts_b = parse_version(b);

    for (pa, pb) in parts_a.iter().zip(parts_b.iter()) {
        if pa == pb {
            continue;
        }
        return pa.try_cmp(pb);
    }

    Some(parts_a.len().cmp(&parts_b.len()))
}

/// Returns true if `latest` should be reported as an update over `tracked`
///
/// Ill-formed pairs that cannot be ordered count as an update whenever the two
/// strings differ.
pub fn is_newer(latest: &str, tracked: &str) -> bool {
    match compare_versions(latest, tracked) {
        Some(ordering) => ordering == Ordering::Greater,
        None => latest != tracked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_numeric() {
        assert_eq!(
            parse_version("18.2.0"),
            vec![
                VersionPart::number(18),
                VersionPart::number(2),
                VersionPart::number(0)
            ]
        );
    }

    #[test]
    fn test_parse_version_mixed() {
        assert_eq!(
            parse_version("5.0.0rc1"),
            vec![
                VersionPart::number(5),
                VersionPart::number(0),
                VersionPart::Text("0rc1".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_version_leading_zero() {
        assert_eq!(
            parse_version("1.01"),
            vec![VersionPart::number(1), VersionPart::number(1)]
        );
    }

    #[test]
    fn test_is_newer_well_formed() {
        assert!(is_newer("1.2.0", "1.1.9"));
        assert!(!is_newer("1.1.9", "1.2.0"));
        assert!(!is_newer("2.0.0", "2.0.0"));
    }

    #[test]
    fn test_is_newer_numeric_not_lexical() {
        assert!(is_newer("1.10.0", "1.9.0"));
        assert!(!is_newer("1.9.0", "1.10.0"));
    }

    #[test]
    fn test_is_newer_malformed_falls_back_to_inequality() {
        // "a" vs 0 cannot be ordered, so any difference counts as an update
        assert!(is_newer("1.2.a", "1.2.0"));
        assert!(is_newer("1.2.0", "1.2.a"));
        assert_eq!(compare_versions("1.2.a", "1.2.0"), None);
    }

    #[test]
    fn test_is_newer_identical_malformed() {
        assert!(!is_newer("1.2.a", "1.2.a"));
    }

    #[test]
    fn test_is_newer_text_components_compare_as_text() {
        assert!(is_newer("1.0.rc2", "1.0.rc1"));
        assert!(!is_newer("1.0.rc1", "1.0.rc2"));
    }

    #[test]
    fn test_length_mismatch_shorter_is_smaller() {
        // Surprising but intended: a missing component is not an implicit zero
        assert!(is_newer("1.2.0", "1.2"));
        assert!(!is_newer("1.2", "1.2.0"));
        assert_eq!(compare_versions("1.2", "1.2.0"), Some(Ordering::Less));
        assert!(is_newer("1.2.1", "1.2"));
    }

    #[test]
    fn test_mismatch_before_length_matters() {
        assert!(!is_newer("1.1.5", "1.2"));
        assert!(is_newer("1.3", "1.2.9"));
    }

    #[test]
    fn test_components_wider_than_u64() {
        assert!(!is_newer("1", "99999999999999999999"));
        assert!(is_newer("99999999999999999999", "1"));
        assert!(is_newer("1.100000000000000000000", "1.99999999999999999999"));
        assert_eq!(
            compare_versions("2.99999999999999999999", "2.99999999999999999999"),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_leading_zeros_do_not_affect_order() {
        assert_eq!(compare_versions("1.007", "1.7"), Some(Ordering::Equal));
        assert!(!is_newer("1.09", "1.10"));
        assert_eq!(parse_version("0.00"), vec![VersionPart::number(0), VersionPart::number(0)]);
    }

    #[test]
    fn test_compare_versions_equal() {
        assert_eq!(compare_versions("3.12.1", "3.12.1"), Some(Ordering::Equal));
    }

    #[test]
    fn test_version_part_display() {
        assert_eq!(VersionPart::number(7).to_string(), "7");
        assert_eq!(VersionPart::Text("beta".to_string()).to_string(), "beta");
    }
}
