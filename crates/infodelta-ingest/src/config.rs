//! Conversion configuration.
//!
//! ```json
//! {
//!   "infoboxes": { "infobox actor": ["name", "birth_date"] },
//!   "statements": ["update", "delete", "insert"],
//!   "auto_detect": false
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use infodelta_core::{Action, AttributeSet, Selection};

use crate::error::IngestError;
use crate::infobox::canonical_infobox_type;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Infobox type → curated attribute list (column order).
    pub infoboxes: BTreeMap<String, Vec<String>>,
    #[serde(default = "all_actions")]
    pub statements: Vec<Action>,
    /// Must be set for an empty attribute list to be accepted.
    #[serde(default)]
    pub auto_detect: bool,
}

fn all_actions() -> Vec<Action> {
    Action::ALL.to_vec()
}

impl ConvertConfig {
    pub fn from_json_str(text: &str) -> Result<Self, IngestError> {
        let config: ConvertConfig = serde_json::from_str(text)
            .map_err(|e| IngestError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let text = fs::read_to_string(path).map_err(IngestError::file(path))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.infoboxes.is_empty() {
            return Err(IngestError::Config("no infobox types configured".into()));
        }
        if !self.auto_detect {
            if let Some((name, _)) = self.infoboxes.iter().find(|(_, attrs)| attrs.is_empty()) {
                return Err(IngestError::Config(format!(
                    "infobox `{name}` has no attributes; list them or set \"auto_detect\": true"
                )));
            }
        }
        Ok(())
    }

    pub fn selection(&self) -> Selection {
        self.statements.iter().copied().collect()
    }

    /// `(canonical type, attribute set)` for every configured infobox.
    pub fn targets(&self) -> Vec<(String, AttributeSet)> {
        self.infoboxes
            .iter()
            .map(|(name, attrs)| (canonical_infobox_type(name), AttributeSet::resolve(attrs)))
            .collect()
    }
}
