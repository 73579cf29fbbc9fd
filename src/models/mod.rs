//! Data models for telcotag.
//!
//! This module defines the core data structures:
//! - `CaseRecord` - One row of the portal case search, as it arrives on the wire
//! - `Case` - A support case with its status and optional linked bugzilla
//! - `CaseMap` - Cases keyed by case number
//! - `BugReference` - A bugzilla linked from a specific case
//!
//! It also holds the `Telco` whiteboard tag rules shared by the resolver and
//! the tagger.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Tag token written to the internal whiteboard.
pub const TELCO_TAG: &str = "Telco";

/// Case status that excludes a case from bug resolution.
pub const CLOSED_STATUS: &str = "Closed";

/// A single document from the case search response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseRecord {
    pub case_number: String,

    pub case_status: String,

    /// Sometimes there is no bugzilla attached to the case
    #[serde(
        rename = "case_bugzillaNumber",
        default,
        deserialize_with = "optional_id"
    )]
    pub case_bugzilla_number: Option<String>,
}

/// A support case from the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub case_number: String,
    pub status: String,
    pub bug_id: Option<String>,
}

impl Case {
    /// Whether this case should have its bugzillas resolved: it must be
    /// linked to a bug and not be closed.
    pub fn needs_resolution(&self) -> bool {
        self.bug_id.is_some() && self.status != CLOSED_STATUS
    }
}

impl From<CaseRecord> for Case {
    fn from(record: CaseRecord) -> Self {
        Self {
            case_number: record.case_number,
            status: record.case_status,
            bug_id: record.case_bugzilla_number,
        }
    }
}

/// Cases keyed by case number, iterated in ascending case-number order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseMap(BTreeMap<String, Case>);

impl CaseMap {
    /// Build the map from search rows. A later row with the same case number
    /// replaces the earlier one.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CaseRecord>,
    {
        let mut map = BTreeMap::new();
        for record in records {
            let case = Case::from(record);
            map.insert(case.case_number.clone(), case);
        }
        Self(map)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, case_number: &str) -> Option<&Case> {
        self.0.get(case_number)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Case> {
        self.0.values()
    }

    /// Cases with a linked bugzilla that are not closed.
    pub fn needing_resolution(&self) -> impl Iterator<Item = &Case> {
        self.iter().filter(|case| case.needs_resolution())
    }
}

impl<'a> IntoIterator for &'a CaseMap {
    type Item = &'a Case;
    type IntoIter = btree_map::Values<'a, String, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A bugzilla linked from a support case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugReference {
    pub case_number: String,
    pub bugzilla_number: String,
}

/// Check whether an internal whiteboard already carries the `Telco` tag.
///
/// The tag counts as present when the whiteboard contains `"Telco "`, ends
/// with `"Telco"`, or contains `"Telco, "`. The match is case-sensitive, so
/// `"Telcofoo"` is untagged while `"fooTelco"` is tagged.
pub fn has_telco_tag(whiteboard: &str) -> bool {
    whiteboard.contains("Telco ") || whiteboard.ends_with(TELCO_TAG) || whiteboard.contains("Telco, ")
}

/// Whiteboard value with `Telco ` prepended.
pub fn with_telco_tag(whiteboard: &str) -> String {
    format!("{} {}", TELCO_TAG, whiteboard)
}

/// Ids arrive either as JSON strings or numbers depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(u64),
}

impl From<IdValue> for String {
    fn from(value: IdValue) -> Self {
        match value {
            IdValue::Text(text) => text,
            IdValue::Number(number) => number.to_string(),
        }
    }
}

pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<IdValue>::deserialize(deserializer)?.map(String::from))
}

pub(crate) fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(IdValue::deserialize(deserializer)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: &str, status: &str, bug: Option<&str>) -> CaseRecord {
        CaseRecord {
            case_number: number.to_string(),
            case_status: status.to_string(),
            case_bugzilla_number: bug.map(str::to_string),
        }
    }

    // ==================== Whiteboard Tag Tests ====================

    #[test]
    fn test_tag_present_with_trailing_space() {
        assert!(has_telco_tag("Telco foo"));
    }

    #[test]
    fn test_tag_present_at_tail() {
        assert!(has_telco_tag("foo Telco"));
        assert!(has_telco_tag("Telco"));
    }

    #[test]
    fn test_tag_present_with_trailing_comma() {
        assert!(has_telco_tag("Telco, foo"));
    }

    #[test]
    fn test_tag_inside_another_word_is_untagged() {
        assert!(!has_telco_tag("Telcofoo"));
    }

    #[test]
    fn test_tag_check_is_case_sensitive() {
        assert!(!has_telco_tag("telco foo"));
        assert!(!has_telco_tag("TELCO"));
    }

    #[test]
    fn test_empty_whiteboard_is_untagged() {
        assert!(!has_telco_tag(""));
    }

    #[test]
    fn test_with_telco_tag_prepends() {
        assert_eq!(with_telco_tag("foo"), "Telco foo");
        assert!(has_telco_tag(&with_telco_tag("Telcofoo")));
    }

    // ==================== CaseMap Tests ====================

    #[test]
    fn test_case_map_keys_every_record() {
        let cases = CaseMap::from_records(vec![
            record("001", "Open", Some("11")),
            record("002", "Closed", None),
            record("003", "Waiting on Red Hat", Some("33")),
        ]);

        assert_eq!(cases.len(), 3);
        assert_eq!(cases.get("001").unwrap().bug_id.as_deref(), Some("11"));
        assert_eq!(cases.get("002").unwrap().status, "Closed");
        assert!(cases.get("002").unwrap().bug_id.is_none());
    }

    #[test]
    fn test_case_map_later_duplicate_wins() {
        let cases = CaseMap::from_records(vec![
            record("001", "Open", Some("11")),
            record("001", "Closed", None),
        ]);

        assert_eq!(cases.len(), 1);
        assert_eq!(cases.get("001").unwrap().status, "Closed");
    }

    #[test]
    fn test_needing_resolution_skips_closed_and_unlinked() {
        let cases = CaseMap::from_records(vec![
            record("001", "Open", Some("11")),
            record("002", "Closed", Some("22")),
            record("003", "Open", None),
        ]);

        let numbers: Vec<&str> = cases
            .needing_resolution()
            .map(|case| case.case_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["001"]);
    }

    // ==================== Deserialization Tests ====================

    #[test]
    fn test_case_record_deserialize_with_string_bug() {
        let json = r#"{
            "case_number": "03123456",
            "case_status": "Open",
            "case_bugzillaNumber": "2001234"
        }"#;

        let rec: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.case_number, "03123456");
        assert_eq!(rec.case_bugzilla_number.as_deref(), Some("2001234"));
    }

    #[test]
    fn test_case_record_deserialize_with_numeric_bug() {
        let json = r#"{"case_number": "1", "case_status": "Open", "case_bugzillaNumber": 42}"#;

        let rec: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.case_bugzilla_number.as_deref(), Some("42"));
    }

    #[test]
    fn test_case_record_deserialize_without_bug() {
        let json = r#"{"case_number": "1", "case_status": "Closed"}"#;

        let rec: CaseRecord = serde_json::from_str(json).unwrap();
        assert!(rec.case_bugzilla_number.is_none());
    }

    #[test]
    fn test_case_record_missing_status_is_error() {
        let json = r#"{"case_number": "1"}"#;
        assert!(serde_json::from_str::<CaseRecord>(json).is_err());
    }
}
