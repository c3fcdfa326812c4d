//! Article counts per infobox type.
//!
//! The statistics file is plain text, one `"<type> - <count>"` line per type,
//! most frequent first. It is used to pick which types are worth bucketing.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use crate::error::IngestError;
use crate::infobox::statistics_infobox_type;
use crate::progress::Progress;
use crate::record::probe_infobox_name;

/// Types with fewer articles than this are dropped by default.
pub const DEFAULT_MIN_ARTICLES: u64 = 100;

pub type InfoboxCounts = BTreeMap<String, u64>;

/// Count articles per infobox type in a dump.
pub fn count_articles_by_type<R: BufRead>(
    reader: R,
    progress_every: usize,
) -> Result<InfoboxCounts, IngestError> {
    let mut counts = InfoboxCounts::new();
    let mut progress = Progress::new("stats", progress_every);
    for line in reader.lines() {
        let line = line?;
        let n = progress.tick();
        if line.trim().is_empty() {
            continue;
        }
        let name = probe_infobox_name(&line, n)?;
        *counts.entry(statistics_infobox_type(&name)).or_default() += 1;
    }
    tracing::info!(
        lines = progress.lines(),
        types = counts.len(),
        "counted articles"
    );
    Ok(counts)
}

/// Counts in descending order, ties broken by name.
pub fn sorted_by_count(counts: &InfoboxCounts) -> Vec<(&str, u64)> {
    let mut sorted: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
}

pub fn write_statistics<W: Write>(mut out: W, counts: &InfoboxCounts) -> std::io::Result<()> {
    for (name, count) in sorted_by_count(counts) {
        writeln!(out, "{name} - {count}")?;
    }
    out.flush()
}

/// Read a statistics file, keeping types with at least `min_articles`.
/// Blank lines are ignored; lines that do not parse are skipped with a
/// warning.
pub fn read_statistics<R: BufRead>(reader: R, min_articles: u64) -> Result<InfoboxCounts, IngestError> {
    let mut counts = InfoboxCounts::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some((name, count)) = line.rsplit_once(" - ") else {
            tracing::warn!(line = i + 1, "skipping statistics line without a ` - ` separator");
            continue;
        };
        let Ok(count) = count.trim().parse::<u64>() else {
            tracing::warn!(line = i + 1, "skipping statistics line with a non-numeric count");
            continue;
        };
        if count < min_articles {
            continue;
        }
        counts.insert(name.to_string(), count);
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump() -> String {
        let mut text = String::new();
        for (title, infobox) in [
            ("A", "Infobox Actor"),
            ("B", "infobox actor\n| extra"),
            ("C", "Infobox Person"),
        ] {
            text.push_str(&format!(
                "{}\n",
                serde_json::json!({
                    "article_title": title,
                    "attribute": [{"id": 1, "key": "name", "infobox_name": infobox}]
                })
            ));
        }
        text.push('\n');
        text
    }

    #[test]
    fn counts_by_first_line_lowercased() {
        let counts = count_articles_by_type(dump().as_bytes(), 0).unwrap();
        assert_eq!(counts.get("infobox actor"), Some(&2));
        assert_eq!(counts.get("infobox person"), Some(&1));
    }

    #[test]
    fn statistics_file_is_sorted_and_reparsed() {
        let counts = count_articles_by_type(dump().as_bytes(), 0).unwrap();
        let mut out = Vec::new();
        write_statistics(&mut out, &counts).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "infobox actor - 2\ninfobox person - 1\n");

        let reread = read_statistics(text.as_bytes(), 2).unwrap();
        assert_eq!(reread.len(), 1);
        assert_eq!(reread.get("infobox actor"), Some(&2));
    }

    #[test]
    fn malformed_statistics_lines_are_skipped() {
        let text = "no separator\n\ninfobox x - many\n   \ninfobox - with dash - 300\ninfobox y - 120\n";
        let counts = read_statistics(text.as_bytes(), DEFAULT_MIN_ARTICLES).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("infobox - with dash"), Some(&300));
        assert_eq!(counts.get("infobox y"), Some(&120));
    }
}
