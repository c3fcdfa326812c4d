//! Bucket file → baseline CSV + update-statement CSV.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use infodelta_core::{
    replay, AttributeSet, Changelog, ChangelogBuilder, ChangelogSummary, RecordId, Selection,
};

use crate::bucket::bucket_path;
use crate::config::ConvertConfig;
use crate::csv::{baseline_path, create_output, statements_path, write_baseline_csv, write_statements_csv};
use crate::error::IngestError;
use crate::record::parse_article;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub buckets_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Replay the statements against the baseline before writing.
    pub verify: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub infobox_type: String,
    pub attributes: usize,
    pub baseline_path: PathBuf,
    pub statements_path: PathBuf,
    pub summary: ChangelogSummary,
}

/// Feed every article of a bucket into one builder, in line order. Lines
/// sharing an article title belong to the same entity.
pub fn build_changelog<R: BufRead>(reader: R, attributes: AttributeSet) -> Result<Changelog, IngestError> {
    tracing::debug!(mode = ?attributes.mode(), attributes = attributes.len(), "resolved attributes");
    let mut builder = ChangelogBuilder::new(attributes);
    let mut lines = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let n = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        lines += 1;
        let (title, events) = parse_article(&line, n)?.into_events(n)?;
        builder
            .push_entity(&title, events)
            .map_err(|source| IngestError::Changelog { line: n, source })?;
    }
    tracing::info!(
        lines,
        entities = builder.entity_count(),
        attributes = builder.attributes().len(),
        "grouped articles"
    );
    Ok(builder.finish()?)
}

/// Replay the full statement stream against the kept baseline and check
/// that the entities end up as exactly the rows `1..=entities`.
pub fn verify_changelog(changelog: &Changelog) -> Result<(), IngestError> {
    let table = replay(
        &changelog.baseline,
        &changelog.statements,
        changelog.attributes.len(),
    )?;
    let expected = 1..=changelog.summary.entities as RecordId;
    if table.len() != changelog.summary.entities || !table.iter().map(|(id, _)| id).eq(expected) {
        return Err(IngestError::ReplayMismatch {
            rows: table.len(),
            entities: changelog.summary.entities,
        });
    }
    Ok(())
}

/// Convert one infobox type's bucket.
pub fn convert_infobox(
    infobox_type: &str,
    attributes: AttributeSet,
    selection: &Selection,
    options: &ConvertOptions,
) -> Result<ConvertReport, IngestError> {
    let input = bucket_path(&options.buckets_dir, infobox_type);
    tracing::info!(infobox = infobox_type, path = %input.display(), "now parsing");
    let file = File::open(&input).map_err(IngestError::file(&input))?;
    let changelog = build_changelog(BufReader::new(file), attributes)?;

    if options.verify {
        verify_changelog(&changelog)?;
        tracing::info!(infobox = infobox_type, "replay check passed");
    }
    let changelog = changelog.select(selection);

    let baseline_out = baseline_path(&options.out_dir, infobox_type);
    tracing::info!(path = %baseline_out.display(), "writing baseline csv");
    write_baseline_csv(
        create_output(&baseline_out)?,
        &changelog.attributes,
        &changelog.baseline,
    )
    .map_err(IngestError::file(&baseline_out))?;

    let statements_out = statements_path(&options.out_dir, infobox_type);
    tracing::info!(path = %statements_out.display(), "writing updates csv");
    write_statements_csv(
        create_output(&statements_out)?,
        &changelog.attributes,
        &changelog.statements,
    )
    .map_err(IngestError::file(&statements_out))?;

    Ok(ConvertReport {
        infobox_type: infobox_type.to_string(),
        attributes: changelog.attributes.len(),
        baseline_path: baseline_out,
        statements_path: statements_out,
        summary: changelog.summary,
    })
}

/// Convert every infobox type named in `config`. Stops at the first error.
pub fn convert_all(
    config: &ConvertConfig,
    selection: &Selection,
    options: &ConvertOptions,
) -> Result<Vec<ConvertReport>, IngestError> {
    config
        .targets()
        .into_iter()
        .map(|(infobox_type, attributes)| convert_infobox(&infobox_type, attributes, selection, options))
        .collect()
}
