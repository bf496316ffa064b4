//! Format reconciliation
//!
//! Stored documents come in two shapes: the legacy two-mode layout
//! (`darkMode` + `lightMode`) and the canonical `modes` map, usually written
//! with the legacy fields alongside. [`normalize`] turns either into a
//! [`Configuration`]; [`project`] writes a configuration back out in the
//! dual shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::error::{PaletteError, Result};
use crate::index::ColorIndex;
use crate::model::{ColorEntry, Configuration, ModeCollection};
use crate::sync::BuiltInMode;

/// The document as it sits in the store
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    /// Canonical mode map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modes: Option<BTreeMap<String, ModeCollection>>,

    /// Legacy dark mode field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<ModeCollection>,

    /// Legacy light mode field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_mode: Option<ModeCollection>,
}

impl StoredBlob {
    /// Parse a stored document
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Encode for storage
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Whether the document carries the canonical map
    pub fn is_canonical(&self) -> bool {
        self.modes.is_some()
    }
}

/// Normalize a stored document into canonical form.
///
/// Returns `None` when the document has neither a `modes` map nor both legacy
/// fields; callers treat that as "no configuration".
pub fn normalize(raw: StoredBlob) -> Option<Configuration> {
    let mut modes = match raw.modes {
        Some(modes) => modes,
        None => {
            let (dark, light) = (raw.dark_mode?, raw.light_mode?);
            tracing::debug!("Promoting legacy darkMode/lightMode document to modes map");
            let mut modes = BTreeMap::new();
            modes.insert(BuiltInMode::Dark.name().to_string(), dark);
            modes.insert(BuiltInMode::Light.name().to_string(), light);
            modes
        }
    };

    for (name, mode) in modes.iter_mut() {
        if mode.mode.is_empty() {
            mode.mode = name.clone();
        }
    }

    let index = ColorIndex::build(&modes);
    let mut config = Configuration {
        modes,
        dark_mode: None,
        light_mode: None,
        index,
    };
    config.sync_all_mirrors();
    Some(config)
}

/// Project a configuration into the dual-shape document.
///
/// `darkMode`/`lightMode` are independent copies of `modes.dark`/`modes.light`
/// and are omitted when the canonical entry does not exist.
pub fn project(config: &Configuration) -> StoredBlob {
    StoredBlob {
        modes: Some(config.modes.clone()),
        dark_mode: config.modes.get(BuiltInMode::Dark.name()).cloned(),
        light_mode: config.modes.get(BuiltInMode::Light.name()).cloned(),
    }
}

/// Check a caller-supplied document before it replaces the stored one.
///
/// Accepts the canonical shape (every mode has a `colors` array) or the
/// legacy shape (both `darkMode` and `lightMode` with `colors` arrays), then
/// checks every color entry and id uniqueness.
pub fn validate_document(value: Value) -> Result<Configuration> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("configuration must be a JSON object"))?;

    match object.get("modes") {
        Some(Value::Object(modes)) => {
            for (name, mode) in modes {
                if !mode.get("colors").is_some_and(Value::is_array) {
                    return Err(invalid(format!("mode \"{name}\" must have a colors array")));
                }
            }
        }
        Some(Value::Null) | None => {
            for field in BuiltInMode::ALL.map(BuiltInMode::legacy_field) {
                let mode = object
                    .get(field)
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| invalid("missing modes, darkMode, or lightMode"))?;
                if !mode.get("colors").is_some_and(Value::is_array) {
                    return Err(invalid("colors must be arrays"));
                }
            }
        }
        Some(_) => return Err(invalid("modes must be an object")),
    }

    let blob: StoredBlob =
        serde_json::from_value(value).map_err(|e| invalid(format!("malformed entry: {e}")))?;
    let config =
        normalize(blob).ok_or_else(|| invalid("missing modes, darkMode, or lightMode"))?;

    let mut seen = HashSet::new();
    for mode in config.modes.values() {
        for entry in &mode.colors {
            validate_entry(entry)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(invalid(format!("duplicate color id \"{}\"", entry.id)));
            }
        }
    }

    Ok(config)
}

/// Check the invariants of one stored color entry
pub fn validate_entry(entry: &ColorEntry) -> Result<()> {
    if entry.id.trim().is_empty() {
        return Err(invalid("color id must not be empty"));
    }
    crate::colors::validate_fields(
        &entry.color,
        entry.is_hover_card,
        entry.hover_state.as_ref(),
    )
}

fn invalid(message: impl Into<String>) -> PaletteError {
    PaletteError::Validation(format!("Invalid colors configuration: {}", message.into()))
}
