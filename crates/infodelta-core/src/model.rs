//! Core data types: edit events, baseline records and statements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChangelogError;

/// Synthetic, 1-based row id assigned in entity-processing order.
pub type RecordId = u64;

/// Identifier shared by all edits of one revision. Ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// One raw attribute mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub transaction_id: TransactionId,
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl EditEvent {
    pub fn new(transaction_id: u64, key: impl Into<String>) -> Self {
        Self {
            transaction_id: TransactionId(transaction_id),
            key: key.into(),
            old_value: None,
            new_value: None,
        }
    }

    pub fn with_old(mut self, value: impl Into<String>) -> Self {
        self.old_value = Some(value.into());
        self
    }

    pub fn with_new(mut self, value: impl Into<String>) -> Self {
        self.new_value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Update,
    Delete,
    Insert,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Update, Action::Delete, Action::Insert];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Insert => "insert",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "insert" => Ok(Action::Insert),
            _ => Err(ChangelogError::UnknownAction(s.to_string())),
        }
    }
}

/// Snapshot row synthesized from an entity's earliest transaction.
///
/// `article_title` and `values` are stored cleaned (see [`crate::escape`]);
/// `values[i]` belongs to attribute `i` of the owning [`crate::AttributeSet`].
/// Attributes discovered after the record was built have no slot and read as
/// null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineRecord {
    pub id: RecordId,
    pub article_title: String,
    pub values: Vec<Option<String>>,
}

impl BaselineRecord {
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// What one statement does to one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttributeChange {
    #[default]
    Unchanged,
    /// A value with no prior value in the same transaction.
    Assigned(String),
    Replaced {
        old: String,
        new: String,
    },
    /// Only the old value was recorded: the attribute was cleared.
    Removed(String),
}

impl AttributeChange {
    /// `old|new`, the lone value, or an empty string.
    pub fn combined(&self) -> String {
        match self {
            AttributeChange::Unchanged => String::new(),
            AttributeChange::Assigned(new) => new.clone(),
            AttributeChange::Replaced { old, new } => format!("{old}|{new}"),
            AttributeChange::Removed(old) => old.clone(),
        }
    }

    pub fn new_value(&self) -> Option<&str> {
        match self {
            AttributeChange::Assigned(new) | AttributeChange::Replaced { new, .. } => Some(new.as_str()),
            AttributeChange::Unchanged | AttributeChange::Removed(_) => None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, AttributeChange::Unchanged)
    }
}

static UNCHANGED: AttributeChange = AttributeChange::Unchanged;

/// One row of the update-statement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub record_id: RecordId,
    pub article_title: String,
    pub action: Action,
    pub changes: Vec<AttributeChange>,
}

impl Statement {
    pub fn change(&self, index: usize) -> &AttributeChange {
        self.changes.get(index).unwrap_or(&UNCHANGED)
    }

    pub fn combined_value(&self, index: usize) -> String {
        self.change(index).combined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_case_insensitively() {
        assert_eq!("Insert".parse::<Action>(), Ok(Action::Insert));
        assert_eq!(" delete ".parse::<Action>(), Ok(Action::Delete));
        assert!(matches!(
            "upsert".parse::<Action>(),
            Err(ChangelogError::UnknownAction(_))
        ));
    }

    #[test]
    fn action_serde_is_lowercase() {
        let json = serde_json::to_string(&Action::Update).unwrap();
        assert_eq!(json, "\"update\"");
        let back: Action = serde_json::from_str("\"insert\"").unwrap();
        assert_eq!(back, Action::Insert);
    }

    #[test]
    fn combined_values() {
        assert_eq!(AttributeChange::Unchanged.combined(), "");
        assert_eq!(AttributeChange::Assigned("b".into()).combined(), "b");
        assert_eq!(AttributeChange::Removed("a".into()).combined(), "a");
        let replaced = AttributeChange::Replaced {
            old: "a".into(),
            new: "b".into(),
        };
        assert_eq!(replaced.combined(), "a|b");
        assert_eq!(replaced.new_value(), Some("b"));
    }

    #[test]
    fn missing_change_slot_reads_unchanged() {
        let stmt = Statement {
            record_id: 1,
            article_title: "X".into(),
            action: Action::Update,
            changes: vec![AttributeChange::Assigned("v".into())],
        };
        assert_eq!(stmt.combined_value(0), "v");
        assert_eq!(stmt.combined_value(3), "");
        assert!(stmt.change(3).is_unchanged());
    }
}
