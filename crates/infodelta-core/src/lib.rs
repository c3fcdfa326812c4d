//! Infobox changelog derivation engine
//!
//! Turns per-article infobox edit histories into a relational
//! baseline-plus-changelog representation:
//!
//! ```text
//!   edit events ──► group_edits ──► baseline transaction ──► synthesize_baseline
//!                        │                                          │
//!                        └──► update transactions ──► synthesize_statement
//!                                                           │       │
//!                               split_baseline ◄────────────┼───────┘
//!                                  │         │              │
//!                          kept baseline   inserts ──► merge_inserts ──► Selection
//! ```
//!
//! ## Key Features
//!
//! - **Explicit or detected schemas**: attribute columns come from a curated
//!   list, or (opt-in) are discovered while scanning edit keys
//! - **Ordered output**: the statement stream is non-decreasing by record id,
//!   with an insert always ahead of the updates for the same record
//! - **Replayable**: [`replay::replay`] rebuilds the table from the baseline
//!   and the statements, which is how the output is checked
//!
//! The engine does no file I/O. Callers push edits per article title into a
//! [`ChangelogBuilder`]; it holds one infobox type's edits at a time, which
//! is all a pass needs.

pub mod attributes;
pub mod baseline;
pub mod builder;
pub mod classify;
pub mod error;
pub mod escape;
pub mod grouping;
pub mod merge;
pub mod model;
pub mod replay;
pub mod selection;

pub use attributes::{normalize_key, AttributeMode, AttributeSet};
pub use baseline::synthesize_baseline;
pub use builder::{Changelog, ChangelogBuilder, ChangelogSummary};
pub use classify::synthesize_statement;
pub use error::ChangelogError;
pub use grouping::{group_edits, EntityHistory, Transaction};
pub use merge::{insert_statement, merge_inserts, split_baseline, verify_order};
pub use model::{Action, AttributeChange, BaselineRecord, EditEvent, RecordId, Statement, TransactionId};
pub use replay::{replay, ReplayedRow, ReplayedTable};
pub use selection::Selection;
