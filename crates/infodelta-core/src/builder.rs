//! Per-infobox-type pass: entities in, baseline + statements out.

use serde::Serialize;
use std::collections::HashMap;

use crate::attributes::AttributeSet;
use crate::baseline::synthesize_baseline;
use crate::classify::synthesize_statement;
use crate::error::ChangelogError;
use crate::grouping::group_edits;
use crate::merge::{insert_statement, merge_inserts, split_baseline, verify_order};
use crate::model::{Action, BaselineRecord, EditEvent, RecordId, Statement};
use crate::selection::Selection;

/// Accumulates one infobox type's entities.
///
/// An entity is identified by its article title. Edits pushed under a title
/// that was already seen join that entity's history, so one title always
/// yields exactly one record. Record ids are 1, 2, 3, ... in order of first
/// appearance. Grouping into transactions happens in [`finish`], once every
/// edit of the pass is known.
///
/// [`finish`]: ChangelogBuilder::finish
#[derive(Debug)]
pub struct ChangelogBuilder {
    attributes: AttributeSet,
    entities: Vec<PendingEntity>,
    by_title: HashMap<String, usize>,
}

#[derive(Debug)]
struct PendingEntity {
    title: String,
    events: Vec<EditEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangelogSummary {
    pub entities: usize,
    pub baseline_rows: usize,
    pub inserts: usize,
    pub updates: usize,
    pub deletes: usize,
    /// Statements left after selection.
    pub emitted: usize,
}

/// Finished output of one pass.
#[derive(Debug, Clone)]
pub struct Changelog {
    pub attributes: AttributeSet,
    pub baseline: Vec<BaselineRecord>,
    pub statements: Vec<Statement>,
    pub summary: ChangelogSummary,
}

impl ChangelogBuilder {
    pub fn new(attributes: AttributeSet) -> Self {
        Self {
            attributes,
            entities: Vec::new(),
            by_title: HashMap::new(),
        }
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Add edits of the entity `article_title` and return its record id.
    ///
    /// A title seen before keeps its id and its history is extended.
    pub fn push_entity<I>(&mut self, article_title: &str, events: I) -> Result<RecordId, ChangelogError>
    where
        I: IntoIterator<Item = EditEvent>,
    {
        let events: Vec<EditEvent> = events.into_iter().collect();
        if events.is_empty() {
            return Err(ChangelogError::EmptyHistory {
                title: article_title.to_string(),
            });
        }

        if let Some(&index) = self.by_title.get(article_title) {
            tracing::debug!(
                title = article_title,
                record = index + 1,
                edits = events.len(),
                "merging edits of a repeated article"
            );
            self.entities[index].events.extend(events);
            return Ok(index as RecordId + 1);
        }

        let index = self.entities.len();
        self.by_title.insert(article_title.to_string(), index);
        self.entities.push(PendingEntity {
            title: article_title.to_string(),
            events,
        });
        Ok(index as RecordId + 1)
    }

    /// Synthesize every entity, convert half of the baseline into inserts
    /// and merge them into the statement stream. The result holds every
    /// statement; see [`Changelog::select`].
    pub fn finish(self) -> Result<Changelog, ChangelogError> {
        let mut attributes = self.attributes;
        let mut baseline = Vec::with_capacity(self.entities.len());
        let mut updates = Vec::new();

        for (index, entity) in self.entities.into_iter().enumerate() {
            let id = index as RecordId + 1;
            let history = group_edits(entity.events, &mut attributes).ok_or_else(|| {
                ChangelogError::EmptyHistory {
                    title: entity.title.clone(),
                }
            })?;

            baseline.push(synthesize_baseline(
                id,
                &entity.title,
                &history.baseline,
                &attributes,
            ));
            for transaction in &history.updates {
                updates.push(synthesize_statement(
                    id,
                    &entity.title,
                    transaction,
                    &attributes,
                ));
            }

            tracing::debug!(
                record = id,
                title = %entity.title,
                transactions = history.updates.len() + 1,
                "synthesized entity"
            );
        }

        let entities = baseline.len();
        let (kept, candidates) = split_baseline(baseline);
        let inserts: Vec<Statement> = candidates.into_iter().map(insert_statement).collect();

        let mut summary = ChangelogSummary {
            entities,
            baseline_rows: kept.len(),
            inserts: inserts.len(),
            ..ChangelogSummary::default()
        };
        for stmt in &updates {
            match stmt.action {
                Action::Update => summary.updates += 1,
                Action::Delete => summary.deletes += 1,
                Action::Insert => summary.inserts += 1,
            }
        }

        let statements = merge_inserts(inserts, updates);
        verify_order(&statements)?;
        summary.emitted = statements.len();

        Ok(Changelog {
            attributes,
            baseline: kept,
            statements,
            summary,
        })
    }
}

impl Changelog {
    /// Keep only the statement kinds in `selection`.
    pub fn select(mut self, selection: &Selection) -> Self {
        if !selection.contains(Action::Insert) && self.summary.inserts > 0 {
            tracing::warn!(
                selection = %selection,
                inserts = self.summary.inserts,
                "insert statements are not selected; updates will target records missing from the baseline"
            );
        }
        self.statements = selection.apply(self.statements);
        self.summary.emitted = self.statements.len();
        self
    }
}
