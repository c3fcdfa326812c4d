//! Attribute resolution: the column schema for one infobox type.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    /// Columns come from a curated list; other keys are ignored.
    Explicit,
    /// Every edit key becomes a column the first time it is seen.
    ///
    /// Slower, and attributes discovered late are null for every record
    /// built before them. Opt-in only.
    AutoDetect,
}

/// Case-normalized attribute names in column order.
#[derive(Debug, Clone)]
pub struct AttributeSet {
    mode: AttributeMode,
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

/// Lowercase, with newlines and tabs removed.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '\n' && *c != '\t')
        .collect::<String>()
        .to_lowercase()
}

impl AttributeSet {
    /// Build from a curated list. Duplicates (after normalization) keep
    /// their first position.
    pub fn explicit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self {
            mode: AttributeMode::Explicit,
            names: Vec::new(),
            positions: HashMap::new(),
        };
        for name in names {
            set.insert(normalize_key(name.as_ref()));
        }
        set
    }

    pub fn auto_detect() -> Self {
        Self {
            mode: AttributeMode::AutoDetect,
            names: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// An empty list selects [`AttributeMode::AutoDetect`].
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Self {
        if names.is_empty() {
            tracing::warn!("no attributes configured; detecting attributes from edit keys");
            Self::auto_detect()
        } else {
            Self::explicit(names)
        }
    }

    pub fn mode(&self) -> AttributeMode {
        self.mode
    }

    pub fn is_auto_detect(&self) -> bool {
        self.mode == AttributeMode::AutoDetect
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(&normalize_key(key)).copied()
    }

    /// Record that `key` was seen. In auto-detect mode an unseen key is
    /// appended as a new column; in explicit mode this is a lookup.
    pub fn observe(&mut self, key: &str) -> Option<usize> {
        let normalized = normalize_key(key);
        if let Some(pos) = self.positions.get(&normalized) {
            return Some(*pos);
        }
        match self.mode {
            AttributeMode::Explicit => None,
            AttributeMode::AutoDetect => {
                tracing::debug!(attribute = %normalized, "detected attribute");
                Some(self.insert(normalized))
            }
        }
    }

    fn insert(&mut self, normalized: String) -> usize {
        if let Some(pos) = self.positions.get(&normalized) {
            return *pos;
        }
        let pos = self.names.len();
        self.positions.insert(normalized.clone(), pos);
        self.names.push(normalized);
        pos
    }
}
