//! Wikipedia infobox update dumps → relational CSV
//!
//! The dump is line-delimited JSON, one article per line, each carrying an
//! `attribute` array of edit events. Processing runs in three passes:
//!
//! - **stats**: count articles per infobox type ([`stats`])
//! - **bucket**: split the dump into one file per infobox type ([`bucket`])
//! - **convert**: turn a bucket into a baseline CSV and an update-statement
//!   CSV ([`convert`], built on `infodelta-core`)

pub mod bucket;
pub mod config;
pub mod convert;
pub mod csv;
pub mod error;
pub mod infobox;
mod progress;
pub mod record;
pub mod stats;

pub use bucket::{bucket_articles, BucketOptions, BucketSink, BucketSummary, DirectorySink, MemorySink};
pub use config::ConvertConfig;
pub use convert::{build_changelog, convert_all, convert_infobox, verify_changelog, ConvertOptions, ConvertReport};
pub use error::IngestError;
pub use infobox::{bucket_file_name, canonical_infobox_type};
pub use stats::{count_articles_by_type, read_statistics, write_statistics, InfoboxCounts};
