//! Color id index
//!
//! Maps every color id to the mode holding it so lookups by id do not scan
//! every mode. Built once when a configuration is normalized and kept current
//! by each registry operation.

use std::collections::{BTreeMap, HashMap};

use crate::model::ModeCollection;

/// Id to mode-name lookup table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorIndex {
    by_id: HashMap<String, String>,
    /// Ids seen more than once while building, only possible with hand-edited data
    shadowed: usize,
}

impl ColorIndex {
    /// Build the index from `modes`.
    ///
    /// Duplicate ids resolve to the first occurrence in map order, then in
    /// color order.
    pub fn build(modes: &BTreeMap<String, ModeCollection>) -> Self {
        let mut index = Self::default();
        for (mode_name, mode) in modes {
            for color in &mode.colors {
                if index.by_id.contains_key(&color.id) {
                    index.shadowed += 1;
                    tracing::warn!(
                        "Duplicate color id {} in mode {}; earlier entry wins",
                        color.id,
                        mode_name
                    );
                    continue;
                }
                index.by_id.insert(color.id.clone(), mode_name.clone());
            }
        }
        index
    }

    /// Mode holding `id`
    pub fn mode_of(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    /// Whether `id` is taken
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Record that `id` now lives in `mode_name`
    pub fn insert(&mut self, id: impl Into<String>, mode_name: impl Into<String>) {
        self.by_id.insert(id.into(), mode_name.into());
    }

    /// Forget `id`
    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.by_id.remove(id)
    }

    /// Drop every id that points at `mode_name`
    pub fn remove_mode(&mut self, mode_name: &str) {
        self.by_id.retain(|_, mode| mode != mode_name);
    }

    /// Whether the source data carried duplicate ids
    pub fn has_shadowed(&self) -> bool {
        self.shadowed > 0
    }

    /// Number of indexed ids
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
