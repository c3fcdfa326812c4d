//! CSV rendering of baseline records and statements.
//!
//! Every field is wrapped in double quotes. Record text is already
//! quote-escaped by the engine and goes out verbatim; header names are
//! escaped here. Null renders as `""`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use infodelta_core::escape::escape_quotes;
use infodelta_core::{AttributeSet, BaselineRecord, Statement};

use crate::error::IngestError;
use crate::infobox::output_stem;

pub const BASELINE_DIR: &str = "baseline";
pub const UPDATES_DIR: &str = "updates";

pub fn baseline_path(out_dir: &Path, infobox_type: &str) -> PathBuf {
    out_dir
        .join(BASELINE_DIR)
        .join(format!("{}_baseline_data.csv", output_stem(infobox_type)))
}

pub fn statements_path(out_dir: &Path, infobox_type: &str) -> PathBuf {
    out_dir
        .join(UPDATES_DIR)
        .join(format!("{}_update_statements.csv", output_stem(infobox_type)))
}

fn write_row<W, I, S>(out: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        write!(out, "\"{}\"", field.as_ref())?;
    }
    out.write_all(b"\n")
}

fn header<'a>(leading: &'a [&'a str], attributes: &'a AttributeSet) -> impl Iterator<Item = String> + 'a {
    leading
        .iter()
        .map(|s| s.to_string())
        .chain(attributes.names().iter().map(|n| escape_quotes(n)))
}

pub fn write_baseline_csv<W: Write>(
    mut out: W,
    attributes: &AttributeSet,
    records: &[BaselineRecord],
) -> io::Result<()> {
    write_row(&mut out, header(&["id", "article_title"], attributes))?;
    for record in records {
        let id = record.id.to_string();
        let values = (0..attributes.len()).map(|i| record.value(i).unwrap_or_default());
        write_row(
            &mut out,
            [id.as_str(), record.article_title.as_str()].into_iter().chain(values),
        )?;
    }
    out.flush()
}

pub fn write_statements_csv<W: Write>(
    mut out: W,
    attributes: &AttributeSet,
    statements: &[Statement],
) -> io::Result<()> {
    write_row(&mut out, header(&["::action", "::record", "article_title"], attributes))?;
    for stmt in statements {
        let leading = [
            stmt.action.as_str().to_string(),
            stmt.record_id.to_string(),
            stmt.article_title.clone(),
        ];
        let values = (0..attributes.len()).map(|i| stmt.combined_value(i));
        write_row(&mut out, leading.into_iter().chain(values))?;
    }
    out.flush()
}

/// Create `path`'s parent directory and open it for buffered writing.
pub(crate) fn create_output(path: &Path) -> Result<BufWriter<File>, IngestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(IngestError::file(parent))?;
    }
    let file = File::create(path).map_err(IngestError::file(path))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use infodelta_core::{Action, AttributeChange};

    fn attrs() -> AttributeSet {
        AttributeSet::explicit(["name", "caption"])
    }

    #[test]
    fn baseline_rows_quote_everything() {
        let records = vec![BaselineRecord {
            id: 1,
            article_title: "The \"\"Rock\"\"".into(),
            values: vec![Some("Dwayne".into())],
        }];
        let mut out = Vec::new();
        write_baseline_csv(&mut out, &attrs(), &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\"id\",\"article_title\",\"name\",\"caption\"\n\
             \"1\",\"The \"\"Rock\"\"\",\"Dwayne\",\"\"\n"
        );
    }

    #[test]
    fn statement_rows_render_combined_values() {
        let statements = vec![Statement {
            record_id: 2,
            article_title: "X".into(),
            action: Action::Update,
            changes: vec![
                AttributeChange::Replaced {
                    old: "Alice".into(),
                    new: "Bob".into(),
                },
                AttributeChange::Unchanged,
            ],
        }];
        let mut out = Vec::new();
        write_statements_csv(&mut out, &attrs(), &statements).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\"::action\",\"::record\",\"article_title\",\"name\",\"caption\"\n\
             \"update\",\"2\",\"X\",\"Alice|Bob\",\"\"\n"
        );
    }

    #[test]
    fn output_paths_use_underscored_stems() {
        let out = Path::new("data");
        assert_eq!(
            baseline_path(out, "infobox actor"),
            Path::new("data/baseline/infobox_actor_baseline_data.csv")
        );
        assert_eq!(
            statements_path(out, "infobox actor"),
            Path::new("data/updates/infobox_actor_update_statements.csv")
        );
    }
}
