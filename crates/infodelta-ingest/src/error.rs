use std::io;
use std::path::{Path, PathBuf};

use infodelta_core::ChangelogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: malformed article record ({source}): `{excerpt}`")]
    MalformedLine {
        line: usize,
        excerpt: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: article has no edits in its `attribute` array")]
    EmptyAttributes { line: usize },

    #[error("line {line}: transaction id `{id}` is not a non-negative integer")]
    InvalidTransactionId { line: usize, id: String },

    #[error("line {line}: first edit carries no `infobox_name`")]
    MissingInfoboxName { line: usize },

    #[error("line {line}: {source}")]
    Changelog {
        line: usize,
        #[source]
        source: ChangelogError,
    },

    #[error(transparent)]
    Output(#[from] ChangelogError),

    #[error("replay produced {rows} rows for {entities} articles")]
    ReplayMismatch { rows: usize, entities: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl IngestError {
    pub(crate) fn file(path: &Path) -> impl FnOnce(io::Error) -> IngestError + '_ {
        move |source| IngestError::File {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, text: &str, source: serde_json::Error) -> Self {
        const EXCERPT_CHARS: usize = 120;
        let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
        if text.chars().nth(EXCERPT_CHARS).is_some() {
            excerpt.push_str("...");
        }
        IngestError::MalformedLine {
            line,
            excerpt,
            source,
        }
    }
}
