//! Split a dump into one file per infobox type.
//!
//! Articles are buffered per type and handed to a [`BucketSink`] whenever the
//! buffer reaches `flush_every` lines, so memory stays bounded no matter how
//! large the dump is.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::IngestError;
use crate::infobox::{bucket_file_name, canonical_infobox_type};
use crate::progress::Progress;
use crate::record::probe_infobox_name;

/// Where bucketed articles go.
pub trait BucketSink {
    /// Append `records` (one JSON object each) to the bucket of `infobox_type`.
    fn append(&mut self, infobox_type: &str, records: &[String]) -> Result<(), IngestError>;
}

/// Appends to `<dir>/<bucket file name>`, one JSON object per line.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, IngestError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(IngestError::file(&dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, infobox_type: &str) -> PathBuf {
        bucket_path(&self.dir, infobox_type)
    }
}

/// Path of an infobox type's bucket inside `dir`.
pub fn bucket_path(dir: &Path, infobox_type: &str) -> PathBuf {
    dir.join(bucket_file_name(infobox_type))
}

impl BucketSink for DirectorySink {
    fn append(&mut self, infobox_type: &str, records: &[String]) -> Result<(), IngestError> {
        let path = self.path_for(infobox_type);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(IngestError::file(&path))?;
        let mut out = BufWriter::new(file);
        for record in records {
            writeln!(out, "{record}").map_err(IngestError::file(&path))?;
        }
        out.flush().map_err(IngestError::file(&path))?;
        tracing::debug!(path = %path.display(), records = records.len(), "appended bucket");
        Ok(())
    }
}

/// Keeps buckets in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub buckets: BTreeMap<String, Vec<String>>,
}

impl BucketSink for MemorySink {
    fn append(&mut self, infobox_type: &str, records: &[String]) -> Result<(), IngestError> {
        self.buckets
            .entry(infobox_type.to_string())
            .or_default()
            .extend_from_slice(records);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BucketOptions {
    /// Canonical infobox types to keep; `None` keeps every type.
    pub targets: Option<BTreeSet<String>>,
    pub flush_every: usize,
    /// Resume support: lines to skip before routing starts.
    pub skip_lines: usize,
    pub progress_every: usize,
}

impl Default for BucketOptions {
    fn default() -> Self {
        Self {
            targets: None,
            flush_every: 5000,
            skip_lines: 0,
            progress_every: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BucketSummary {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub routed: BTreeMap<String, u64>,
    pub flushes: usize,
}

/// Route every article of `reader` to its infobox type's bucket.
pub fn bucket_articles<R, S>(
    reader: R,
    sink: &mut S,
    options: &BucketOptions,
) -> Result<BucketSummary, IngestError>
where
    R: BufRead,
    S: BucketSink + ?Sized,
{
    let mut summary = BucketSummary::default();
    let mut buffer: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut buffered = 0usize;
    let mut progress = Progress::new("bucket", options.progress_every);

    for line in reader.lines() {
        let line = line?;
        let n = progress.tick();
        if n <= options.skip_lines {
            summary.lines_skipped += 1;
            continue;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let infobox_type = canonical_infobox_type(&probe_infobox_name(text, n)?);
        if let Some(targets) = &options.targets {
            if !targets.contains(&infobox_type) {
                continue;
            }
        }

        *summary.routed.entry(infobox_type.clone()).or_default() += 1;
        buffer.entry(infobox_type).or_default().push(text.to_string());
        buffered += 1;

        if options.flush_every > 0 && buffered >= options.flush_every {
            flush(&mut buffer, sink)?;
            summary.flushes += 1;
            buffered = 0;
        }
    }

    if buffered > 0 {
        flush(&mut buffer, sink)?;
        summary.flushes += 1;
    }
    summary.lines_read = progress.lines();

    for (infobox_type, count) in &summary.routed {
        tracing::info!(infobox = %infobox_type, articles = count, "bucketed");
    }
    Ok(summary)
}

fn flush<S: BucketSink + ?Sized>(
    buffer: &mut BTreeMap<String, Vec<String>>,
    sink: &mut S,
) -> Result<(), IngestError> {
    tracing::debug!(types = buffer.len(), "flushing buckets");
    for (infobox_type, records) in std::mem::take(buffer) {
        sink.append(&infobox_type, &records)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn line(title: &str, infobox: &str) -> String {
        serde_json::json!({
            "article_title": title,
            "attribute": [{"id": 1, "key": "name", "newvalue": title, "infobox_name": infobox}]
        })
        .to_string()
    }

    fn dump() -> String {
        [
            line("A", "Infobox Actor"),
            line("B", "Template:Infobox_Person"),
            line("C", "infobox  actor"),
            String::new(),
            line("D", "Infobox Person"),
        ]
        .join("\n")
    }

    #[test]
    fn routes_by_canonical_type() {
        let mut sink = MemorySink::default();
        let summary = bucket_articles(dump().as_bytes(), &mut sink, &BucketOptions::default()).unwrap();
        assert_eq!(summary.lines_read, 5);
        assert_eq!(summary.routed.get("infobox actor"), Some(&2));
        assert_eq!(summary.routed.get("infobox person"), Some(&2));
        assert_eq!(sink.buckets["infobox actor"], vec![line("A", "Infobox Actor"), line("C", "infobox  actor")]);
    }

    #[test]
    fn flushes_in_bounded_batches() {
        let mut sink = MemorySink::default();
        let options = BucketOptions {
            flush_every: 1,
            ..BucketOptions::default()
        };
        let summary = bucket_articles(dump().as_bytes(), &mut sink, &options).unwrap();
        assert_eq!(summary.flushes, 4);
        assert_eq!(sink.buckets["infobox person"].len(), 2);
    }

    #[test]
    fn honours_targets_and_skip() {
        let mut sink = MemorySink::default();
        let options = BucketOptions {
            targets: Some(BTreeSet::from(["infobox person".to_string()])),
            skip_lines: 2,
            ..BucketOptions::default()
        };
        let summary = bucket_articles(dump().as_bytes(), &mut sink, &options).unwrap();
        assert_eq!(summary.lines_skipped, 2);
        assert_eq!(sink.buckets.len(), 1);
        assert_eq!(sink.buckets["infobox person"], vec![line("D", "Infobox Person")]);
    }

    #[test]
    fn directory_sink_appends_across_flushes() {
        let dir = tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("buckets")).unwrap();
        let options = BucketOptions {
            flush_every: 1,
            ..BucketOptions::default()
        };
        bucket_articles(dump().as_bytes(), &mut sink, &options).unwrap();

        let text = std::fs::read_to_string(sink.path_for("infobox actor")).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(sink.dir().join("infobox person").exists());
    }

    #[test]
    fn missing_infobox_name_is_fatal() {
        let mut sink = MemorySink::default();
        let input = r#"{"article_title":"A","attribute":[{"id":1,"key":"k"}]}"#;
        let err = bucket_articles(input.as_bytes(), &mut sink, &BucketOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingInfoboxName { line: 1 }));
    }
}
