//! Palette data model
//!
//! Wire names are camelCase to stay readable by consumers of the stored
//! document that predate this crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::index::ColorIndex;

/// A CSS color given both as hex and as an `rgb(...)` string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorValue {
    /// Hex notation, e.g. `#112233`
    pub hex: String,
    /// Functional notation, e.g. `rgb(17, 34, 51)`
    pub rgb: String,
}

impl ColorValue {
    /// Create a color value
    pub fn new(hex: impl Into<String>, rgb: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            rgb: rgb.into(),
        }
    }
}

/// Resting and hovered colors for a hover card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverState {
    /// Resting hex
    pub hex: String,
    /// Resting rgb
    pub rgb: String,
    /// Hovered hex
    pub hover_hex: String,
    /// Hovered rgb
    pub hover_rgb: String,
}

/// A single named color inside a mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    /// Identifier, unique across the whole configuration. Callers creating
    /// a mode may leave it empty to have one assigned.
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The color itself
    pub color: ColorValue,

    /// Whether this entry renders as a hover card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hover_card: Option<bool>,

    /// Hover colors, required when `is_hover_card` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_state: Option<HoverState>,
}

/// Color fields supplied by a caller, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDraft {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The color itself
    pub color: ColorValue,

    /// Whether this entry renders as a hover card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hover_card: Option<bool>,

    /// Hover colors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_state: Option<HoverState>,
}

impl ColorDraft {
    /// Plain (non-hover) color
    pub fn new(hex: impl Into<String>, rgb: impl Into<String>) -> Self {
        Self {
            name: None,
            color: ColorValue::new(hex, rgb),
            is_hover_card: None,
            hover_state: None,
        }
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Turn this draft into a hover card
    pub fn with_hover(
        mut self,
        hover_hex: impl Into<String>,
        hover_rgb: impl Into<String>,
    ) -> Self {
        self.is_hover_card = Some(true);
        self.hover_state = Some(HoverState {
            hex: self.color.hex.clone(),
            rgb: self.color.rgb.clone(),
            hover_hex: hover_hex.into(),
            hover_rgb: hover_rgb.into(),
        });
        self
    }

    /// Attach an id
    pub fn into_entry(self, id: impl Into<String>) -> ColorEntry {
        ColorEntry {
            id: id.into(),
            name: self.name,
            color: self.color,
            is_hover_card: self.is_hover_card,
            hover_state: self.hover_state,
        }
    }
}

impl From<ColorEntry> for ColorDraft {
    fn from(entry: ColorEntry) -> Self {
        Self {
            name: entry.name,
            color: entry.color,
            is_hover_card: entry.is_hover_card,
            hover_state: entry.hover_state,
        }
    }
}

/// A named mode and its ordered colors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCollection {
    /// The mode's own name. Older documents may omit it; the map key fills it in.
    #[serde(default)]
    pub mode: String,

    /// Colors in display order
    pub colors: Vec<ColorEntry>,
}

impl ModeCollection {
    /// Create an empty mode
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            colors: Vec::new(),
        }
    }

    /// Create a mode holding `colors`
    pub fn with_colors(mode: impl Into<String>, colors: Vec<ColorEntry>) -> Self {
        Self {
            mode: mode.into(),
            colors,
        }
    }

    /// Position of the color with `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.colors.iter().position(|c| c.id == id)
    }

    /// Whether the mode holds no colors yet
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Canonical in-memory palette configuration
///
/// Only reachable through [`crate::reconcile::normalize`] or
/// [`Configuration::new`], so `modes`, the legacy mirrors, and the id index
/// always agree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Configuration {
    pub(crate) modes: BTreeMap<String, ModeCollection>,
    pub(crate) dark_mode: Option<ModeCollection>,
    pub(crate) light_mode: Option<ModeCollection>,
    pub(crate) index: ColorIndex,
}

impl Configuration {
    /// An empty configuration with no modes
    pub fn new() -> Self {
        Self::default()
    }

    /// All modes by name
    pub fn modes(&self) -> &BTreeMap<String, ModeCollection> {
        &self.modes
    }

    /// Look up one mode
    pub fn mode(&self, name: &str) -> Option<&ModeCollection> {
        self.modes.get(name)
    }

    /// Legacy `darkMode` mirror
    pub fn dark_mode(&self) -> Option<&ModeCollection> {
        self.dark_mode.as_ref()
    }

    /// Legacy `lightMode` mirror
    pub fn light_mode(&self) -> Option<&ModeCollection> {
        self.light_mode.as_ref()
    }

    /// Find a color and the mode holding it
    pub fn color(&self, id: &str) -> Option<(&str, &ColorEntry)> {
        let mode_name = self.index.mode_of(id)?;
        let (name, mode) = self.modes.get_key_value(mode_name)?;
        let position = mode.position_of(id)?;
        Some((name.as_str(), &mode.colors[position]))
    }

    /// Total number of colors across all modes
    pub fn color_count(&self) -> usize {
        self.modes.values().map(|m| m.colors.len()).sum()
    }

    /// Color count per mode
    pub fn summary(&self) -> BTreeMap<String, usize> {
        self.modes
            .iter()
            .map(|(name, mode)| (name.clone(), mode.colors.len()))
            .collect()
    }
}
