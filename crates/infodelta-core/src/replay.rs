//! Replay statements against a baseline table.
//!
//! Used to check that the baseline and the statement stream together
//! describe the same final state as the raw edit history.

use std::collections::BTreeMap;

use crate::error::ChangelogError;
use crate::model::{Action, AttributeChange, BaselineRecord, RecordId, Statement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedRow {
    pub article_title: String,
    pub values: Vec<Option<String>>,
}

impl ReplayedRow {
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayedTable {
    rows: BTreeMap<RecordId, ReplayedRow>,
}

impl ReplayedTable {
    pub fn get(&self, id: RecordId) -> Option<&ReplayedRow> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &ReplayedRow)> {
        self.rows.iter().map(|(id, row)| (*id, row))
    }
}

/// Apply `statements` in sequence order on top of `baseline`.
///
/// `insert` creates a row, `update` and `delete` change an existing one. A
/// `delete` clears attributes; the row itself stays. Every row is padded to
/// `width` columns.
pub fn replay(
    baseline: &[BaselineRecord],
    statements: &[Statement],
    width: usize,
) -> Result<ReplayedTable, ChangelogError> {
    let mut table = ReplayedTable::default();
    for record in baseline {
        let mut values = record.values.clone();
        values.resize(width, None);
        let row = ReplayedRow {
            article_title: record.article_title.clone(),
            values,
        };
        if table.rows.insert(record.id, row).is_some() {
            return Err(ChangelogError::RecordExists {
                record_id: record.id,
            });
        }
    }

    for stmt in statements {
        match stmt.action {
            Action::Insert => {
                if table.rows.contains_key(&stmt.record_id) {
                    return Err(ChangelogError::RecordExists {
                        record_id: stmt.record_id,
                    });
                }
                let values = (0..width)
                    .map(|i| stmt.change(i).new_value().map(str::to_string))
                    .collect();
                table.rows.insert(
                    stmt.record_id,
                    ReplayedRow {
                        article_title: stmt.article_title.clone(),
                        values,
                    },
                );
            }
            Action::Update | Action::Delete => {
                let row = table.rows.get_mut(&stmt.record_id).ok_or(
                    ChangelogError::UnknownRecord {
                        action: stmt.action,
                        record_id: stmt.record_id,
                    },
                )?;
                for (i, slot) in row.values.iter_mut().enumerate() {
                    match stmt.change(i) {
                        AttributeChange::Unchanged => {}
                        AttributeChange::Removed(_) => *slot = None,
                        AttributeChange::Assigned(new) | AttributeChange::Replaced { new, .. } => {
                            *slot = Some(new.clone())
                        }
                    }
                }
            }
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(id: RecordId, name: &str) -> BaselineRecord {
        BaselineRecord {
            id,
            article_title: format!("T{id}"),
            values: vec![Some(name.to_string())],
        }
    }

    fn stmt(record_id: RecordId, action: Action, changes: Vec<AttributeChange>) -> Statement {
        Statement {
            record_id,
            article_title: format!("T{record_id}"),
            action,
            changes,
        }
    }

    #[test]
    fn applies_updates_and_removals() {
        let table = replay(
            &[baseline(1, "Alice")],
            &[
                stmt(
                    1,
                    Action::Update,
                    vec![
                        AttributeChange::Replaced {
                            old: "Alice".into(),
                            new: "Bob".into(),
                        },
                        AttributeChange::Assigned("30".into()),
                    ],
                ),
                stmt(
                    1,
                    Action::Delete,
                    vec![AttributeChange::Unchanged, AttributeChange::Removed("30".into())],
                ),
            ],
            2,
        )
        .unwrap();
        let row = table.get(1).unwrap();
        assert_eq!(row.value(0), Some("Bob"));
        assert_eq!(row.value(1), None);
    }

    #[test]
    fn insert_creates_row() {
        let table = replay(
            &[],
            &[stmt(5, Action::Insert, vec![AttributeChange::Assigned("x".into())])],
            2,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(5).unwrap().values, vec![Some("x".to_string()), None]);
    }

    #[test]
    fn rows_iterate_by_record_id() {
        assert!(replay(&[], &[], 1).unwrap().is_empty());

        let table = replay(
            &[baseline(2, "b"), baseline(1, "a")],
            &[stmt(3, Action::Insert, vec![AttributeChange::Assigned("c".into())])],
            1,
        )
        .unwrap();
        assert!(!table.is_empty());
        let rows: Vec<_> = table.iter().map(|(id, row)| (id, row.value(0))).collect();
        assert_eq!(rows, [(1, Some("a")), (2, Some("b")), (3, Some("c"))]);
    }

    #[test]
    fn update_of_missing_record_fails() {
        let err = replay(&[], &[stmt(9, Action::Update, Vec::new())], 1).unwrap_err();
        assert_eq!(
            err,
            ChangelogError::UnknownRecord {
                action: Action::Update,
                record_id: 9
            }
        );
    }

    #[test]
    fn insert_over_baseline_fails() {
        let err = replay(
            &[baseline(1, "a")],
            &[stmt(1, Action::Insert, Vec::new())],
            1,
        )
        .unwrap_err();
        assert_eq!(err, ChangelogError::RecordExists { record_id: 1 });
    }
}
