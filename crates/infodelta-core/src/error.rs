use thiserror::Error;

use crate::model::{Action, RecordId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangelogError {
    #[error("article `{title}` has no edit events")]
    EmptyHistory { title: String },

    #[error("unknown statement action `{0}` (expected update, delete or insert)")]
    UnknownAction(String),

    #[error("statement {position} has record id {record_id} after record id {previous}")]
    OutOfOrder {
        position: usize,
        previous: RecordId,
        record_id: RecordId,
    },

    #[error("insert for record {record_id} at statement {position} follows an update/delete for the same record")]
    InsertAfterUpdate { position: usize, record_id: RecordId },

    #[error("record {record_id} is inserted more than once")]
    DuplicateInsert { record_id: RecordId },

    #[error("replay: insert for record {record_id}, which already exists")]
    RecordExists { record_id: RecordId },

    #[error("replay: {action} for record {record_id}, which does not exist")]
    UnknownRecord { action: Action, record_id: RecordId },
}
