//! Insert conversion and statement merging.
//!
//! Baseline synthesis only ever yields updates and deletes. To seed all
//! three statement kinds, the second half of the baseline rows of an
//! infobox type is withdrawn from the baseline table and replayed as
//! `insert` statements instead.

use std::collections::HashSet;

use crate::error::ChangelogError;
use crate::model::{Action, AttributeChange, BaselineRecord, Statement};

/// Split at the midpoint: `(kept, insert_candidates)`. An odd row goes to
/// the insert half.
pub fn split_baseline(mut records: Vec<BaselineRecord>) -> (Vec<BaselineRecord>, Vec<BaselineRecord>) {
    let mid = records.len() / 2;
    let inserts = records.split_off(mid);
    (records, inserts)
}

/// Convert a withdrawn baseline row into an insert. Values are already
/// cleaned and are copied as they are; null columns stay unset.
pub fn insert_statement(record: BaselineRecord) -> Statement {
    let changes = record
        .values
        .into_iter()
        .map(|value| value.map_or(AttributeChange::Unchanged, AttributeChange::Assigned))
        .collect();
    Statement {
        record_id: record.id,
        article_title: record.article_title,
        action: Action::Insert,
        changes,
    }
}

/// Splice `inserts` (ascending by record id) into `updates`.
///
/// Updates are copied through until the first one whose record id is at
/// least the insert's; the insert goes in front of it. Inserts past the last
/// update are appended.
pub fn merge_inserts(inserts: Vec<Statement>, updates: Vec<Statement>) -> Vec<Statement> {
    let mut merged = Vec::with_capacity(inserts.len() + updates.len());
    let mut pending = updates.into_iter().peekable();
    let mut trailing = 0usize;

    for insert in inserts {
        while let Some(update) = pending.next_if(|u| u.record_id < insert.record_id) {
            merged.push(update);
        }
        if pending.peek().is_none() {
            trailing += 1;
        }
        merged.push(insert);
    }
    merged.extend(pending);

    if trailing > 0 {
        tracing::debug!(trailing, "appended inserts past the last update statement");
    }
    merged
}

/// Check that record ids never decrease and that each record has at most
/// one insert, placed before its first update/delete.
pub fn verify_order(statements: &[Statement]) -> Result<(), ChangelogError> {
    let mut inserted = HashSet::new();
    let mut previous: Option<&Statement> = None;

    for (position, stmt) in statements.iter().enumerate() {
        if let Some(prev) = previous {
            if stmt.record_id < prev.record_id {
                return Err(ChangelogError::OutOfOrder {
                    position,
                    previous: prev.record_id,
                    record_id: stmt.record_id,
                });
            }
            if stmt.action == Action::Insert
                && prev.record_id == stmt.record_id
                && prev.action != Action::Insert
            {
                return Err(ChangelogError::InsertAfterUpdate {
                    position,
                    record_id: stmt.record_id,
                });
            }
        }
        if stmt.action == Action::Insert && !inserted.insert(stmt.record_id) {
            return Err(ChangelogError::DuplicateInsert {
                record_id: stmt.record_id,
            });
        }
        previous = Some(stmt);
    }
    Ok(())
}
