//! Edit grouping: per-entity edit events → transactions.

use std::collections::BTreeMap;

use crate::attributes::AttributeSet;
use crate::model::{EditEvent, TransactionId};

/// Edit events sharing one transaction id, in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub edits: Vec<EditEvent>,
}

/// One entity's history split into its baseline (smallest transaction id)
/// and the remaining update transactions, ascending by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHistory {
    pub baseline: Transaction,
    pub updates: Vec<Transaction>,
}

/// Group `events` by transaction id.
///
/// In auto-detect mode every key is fed to `attributes` as a side effect, so
/// the set must be threaded through all entities of one infobox type in a
/// single sequential pass. Returns `None` when there are no events.
pub fn group_edits<I>(events: I, attributes: &mut AttributeSet) -> Option<EntityHistory>
where
    I: IntoIterator<Item = EditEvent>,
{
    let mut by_id: BTreeMap<TransactionId, Vec<EditEvent>> = BTreeMap::new();
    for event in events {
        if attributes.is_auto_detect() {
            attributes.observe(&event.key);
        }
        by_id.entry(event.transaction_id).or_default().push(event);
    }

    let (id, edits) = by_id.pop_first()?;
    let updates = by_id
        .into_iter()
        .map(|(id, edits)| Transaction { id, edits })
        .collect();

    Some(EntityHistory {
        baseline: Transaction { id, edits },
        updates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_id_becomes_baseline() {
        let mut attrs = AttributeSet::explicit(["name"]);
        let events = vec![
            EditEvent::new(30, "name").with_new("c"),
            EditEvent::new(10, "name").with_new("a"),
            EditEvent::new(20, "name").with_new("b"),
            EditEvent::new(10, "image").with_new("x.png"),
        ];
        let history = group_edits(events, &mut attrs).unwrap();
        assert_eq!(history.baseline.id, TransactionId(10));
        assert_eq!(history.baseline.edits.len(), 2);
        assert_eq!(history.baseline.edits[1].key, "image");
        let ids: Vec<_> = history.updates.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, [20, 30]);
    }

    #[test]
    fn ids_compare_numerically() {
        let mut attrs = AttributeSet::explicit(["name"]);
        let events = vec![
            EditEvent::new(9, "name").with_new("nine"),
            EditEvent::new(10, "name").with_new("ten"),
        ];
        let history = group_edits(events, &mut attrs).unwrap();
        assert_eq!(history.baseline.id, TransactionId(9));
    }

    #[test]
    fn empty_history_has_no_baseline() {
        let mut attrs = AttributeSet::auto_detect();
        assert!(group_edits(Vec::new(), &mut attrs).is_none());
    }

    #[test]
    fn auto_detect_collects_keys_while_grouping() {
        let mut attrs = AttributeSet::auto_detect();
        let events = vec![
            EditEvent::new(1, "Name").with_new("a"),
            EditEvent::new(2, "Caption").with_old("c"),
        ];
        group_edits(events, &mut attrs).unwrap();
        assert_eq!(attrs.names(), ["name", "caption"]);
    }

    #[test]
    fn explicit_set_is_not_extended() {
        let mut attrs = AttributeSet::explicit(["name"]);
        group_edits(vec![EditEvent::new(1, "caption")], &mut attrs).unwrap();
        assert_eq!(attrs.names(), ["name"]);
    }
}
