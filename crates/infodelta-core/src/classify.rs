//! Transaction classification and statement synthesis.

use crate::attributes::AttributeSet;
use crate::escape::{clean_value, escape_quotes};
use crate::grouping::Transaction;
use crate::model::{Action, AttributeChange, RecordId, Statement};

/// Turn one update transaction into a statement.
///
/// Per attribute the first new value and the first old value seen win. A
/// transaction without any new value is a `delete`; anything else is an
/// `update`, including transactions that clear some attributes while setting
/// others.
pub fn synthesize_statement(
    record_id: RecordId,
    article_title: &str,
    transaction: &Transaction,
    attributes: &AttributeSet,
) -> Statement {
    let width = attributes.len();
    let mut new_values: Vec<Option<String>> = vec![None; width];
    let mut old_values: Vec<Option<String>> = vec![None; width];

    for edit in &transaction.edits {
        let Some(pos) = attributes.position(&edit.key) else {
            continue;
        };
        if new_values[pos].is_none() {
            new_values[pos] = edit.new_value.as_deref().map(clean_value);
        }
        if old_values[pos].is_none() {
            old_values[pos] = edit.old_value.as_deref().map(clean_value);
        }
    }

    let action = if new_values.iter().all(Option::is_none) {
        Action::Delete
    } else {
        Action::Update
    };

    let changes = old_values
        .into_iter()
        .zip(new_values)
        .map(|pair| match pair {
            (Some(old), Some(new)) => AttributeChange::Replaced { old, new },
            (None, Some(new)) => AttributeChange::Assigned(new),
            (Some(old), None) => AttributeChange::Removed(old),
            (None, None) => AttributeChange::Unchanged,
        })
        .collect();

    Statement {
        record_id,
        article_title: escape_quotes(article_title),
        action,
        changes,
    }
}
