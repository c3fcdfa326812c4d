//! Article records as they appear in the update dump, one JSON object per
//! line.

use serde::Deserialize;

use infodelta_core::{EditEvent, TransactionId};

use crate::error::IngestError;

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    pub article_title: String,
    pub attribute: Vec<RawEdit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdit {
    pub id: RawTransactionId,
    pub key: String,
    #[serde(default)]
    pub newvalue: Option<String>,
    #[serde(default)]
    pub oldvalue: Option<String>,
    #[serde(default)]
    pub infobox_name: Option<String>,
}

/// Dumps carry ids either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTransactionId {
    Number(u64),
    Text(String),
}

impl RawTransactionId {
    pub fn parse(&self, line: usize) -> Result<TransactionId, IngestError> {
        match self {
            RawTransactionId::Number(n) => Ok(TransactionId(*n)),
            RawTransactionId::Text(text) => text
                .trim()
                .parse::<u64>()
                .map(TransactionId)
                .map_err(|_| IngestError::InvalidTransactionId {
                    line,
                    id: text.clone(),
                }),
        }
    }
}

/// Only what routing needs: the infobox name on the first edit.
#[derive(Debug, Deserialize)]
struct InfoboxProbe {
    attribute: Vec<ProbeEdit>,
}

#[derive(Debug, Deserialize)]
struct ProbeEdit {
    #[serde(default)]
    infobox_name: Option<String>,
}

/// Parse one dump line. `line` is 1-based and only used for errors.
pub fn parse_article(text: &str, line: usize) -> Result<ArticleRecord, IngestError> {
    let record: ArticleRecord =
        serde_json::from_str(text).map_err(|e| IngestError::malformed(line, text, e))?;
    if record.attribute.is_empty() {
        return Err(IngestError::EmptyAttributes { line });
    }
    Ok(record)
}

/// The raw infobox name of the article on `text`.
pub fn probe_infobox_name(text: &str, line: usize) -> Result<String, IngestError> {
    let probe: InfoboxProbe =
        serde_json::from_str(text).map_err(|e| IngestError::malformed(line, text, e))?;
    let first = probe
        .attribute
        .into_iter()
        .next()
        .ok_or(IngestError::EmptyAttributes { line })?;
    first
        .infobox_name
        .ok_or(IngestError::MissingInfoboxName { line })
}

impl ArticleRecord {
    pub fn infobox_name(&self) -> Option<&str> {
        self.attribute.first().and_then(|e| e.infobox_name.as_deref())
    }

    /// Convert into engine edit events, validating transaction ids.
    pub fn into_events(self, line: usize) -> Result<(String, Vec<EditEvent>), IngestError> {
        let events = self
            .attribute
            .into_iter()
            .map(|raw| {
                Ok(EditEvent {
                    transaction_id: raw.id.parse(line)?,
                    key: raw.key,
                    old_value: raw.oldvalue,
                    new_value: raw.newvalue,
                })
            })
            .collect::<Result<Vec<_>, IngestError>>()?;
        Ok((self.article_title, events))
    }
}
