use crate::attributes::AttributeSet;
use crate::escape::{clean_value, escape_quotes};
use crate::grouping::Transaction;
use crate::model::{BaselineRecord, RecordId};

/// Fold a baseline transaction into a flat record.
///
/// Each event with a new value for a known attribute sets that column; when
/// a key repeats inside the transaction the last value wins. Columns with no
/// matching event stay null.
pub fn synthesize_baseline(
    id: RecordId,
    article_title: &str,
    baseline: &Transaction,
    attributes: &AttributeSet,
) -> BaselineRecord {
    let mut values: Vec<Option<String>> = vec![None; attributes.len()];
    for edit in &baseline.edits {
        let Some(new_value) = &edit.new_value else {
            continue;
        };
        if let Some(pos) = attributes.position(&edit.key) {
            values[pos] = Some(clean_value(new_value));
        }
    }

    BaselineRecord {
        id,
        article_title: escape_quotes(article_title),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EditEvent, TransactionId};

    fn txn(edits: Vec<EditEvent>) -> Transaction {
        Transaction {
            id: TransactionId(1),
            edits,
        }
    }

    #[test]
    fn takes_new_values_for_known_attributes() {
        let attrs = AttributeSet::explicit(["name", "caption", "image"]);
        let record = synthesize_baseline(
            7,
            "Alice",
            &txn(vec![
                EditEvent::new(1, "Name").with_new("Alice"),
                EditEvent::new(1, "image").with_old("gone.png"),
                EditEvent::new(1, "unrelated").with_new("ignored"),
            ]),
            &attrs,
        );
        assert_eq!(record.id, 7);
        assert_eq!(record.value(0), Some("Alice"));
        assert_eq!(record.value(1), None);
        assert_eq!(record.value(2), None);
        assert_eq!(record.values.len(), 3);
    }

    #[test]
    fn cleans_values_and_escapes_title() {
        let attrs = AttributeSet::explicit(["motto"]);
        let record = synthesize_baseline(
            1,
            "The \"Rock\"",
            &txn(vec![EditEvent::new(1, "motto").with_new("say \"hi\"|now\n")]),
            &attrs,
        );
        assert_eq!(record.article_title, "The \"\"Rock\"\"");
        assert_eq!(record.value(0), Some("say \"\"hi\"\"now"));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let attrs = AttributeSet::explicit(["name"]);
        let record = synthesize_baseline(
            1,
            "X",
            &txn(vec![
                EditEvent::new(1, "name").with_new("first"),
                EditEvent::new(1, "name").with_new("second"),
            ]),
            &attrs,
        );
        assert_eq!(record.value(0), Some("second"));
    }
}
