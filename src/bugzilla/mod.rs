//! Bug tracker capability.
//!
//! The pipeline only needs three operations from Bugzilla, captured by the
//! [`BugTracker`] trait so tests can swap in an in-memory tracker. The
//! production implementation is [`RestBugzilla`].

mod rest;

pub use rest::RestBugzilla;

use std::collections::BTreeMap;

use crate::Result;

/// Logical name of the internal whiteboard field.
pub const INTERNAL_WHITEBOARD: &str = "internal_whiteboard";

/// A Bugzilla bug (only the fields we care about).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bug {
    pub id: u64,
    /// Free-text internal classification; empty when unset
    pub internal_whiteboard: String,
}

/// Field changes to submit for one or more bugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugUpdate {
    fields: BTreeMap<String, String>,
}

impl BugUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The subset of a bug tracker client the pipeline uses.
pub trait BugTracker {
    /// Fetch a bug by id.
    fn get_bug(&self, id: &str) -> Result<Bug>;

    /// Build an update setting one field.
    fn build_update(&self, field: &str, value: String) -> BugUpdate {
        BugUpdate::new().with(field, value)
    }

    /// Submit an update for the given bug ids.
    fn update_bugs(&self, ids: &[u64], update: &BugUpdate) -> Result<()>;
}
