//! Legacy mirror maintenance
//!
//! Older readers only understand the top-level `darkMode`/`lightMode`
//! fields. Whenever a mutation touches the canonical `dark` or `light` mode,
//! the matching mirror is overwritten with a copy of it before the operation
//! returns, so the two never disagree in an observable state.

use std::fmt;

use crate::model::{Configuration, ModeCollection};

/// The two permanently registered modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInMode {
    /// `dark`, mirrored as `darkMode`
    Dark,
    /// `light`, mirrored as `lightMode`
    Light,
}

impl BuiltInMode {
    /// Both built-ins
    pub const ALL: [BuiltInMode; 2] = [BuiltInMode::Dark, BuiltInMode::Light];

    /// Canonical mode name
    pub fn name(self) -> &'static str {
        match self {
            BuiltInMode::Dark => "dark",
            BuiltInMode::Light => "light",
        }
    }

    /// Name of the legacy top-level field
    pub fn legacy_field(self) -> &'static str {
        match self {
            BuiltInMode::Dark => "darkMode",
            BuiltInMode::Light => "lightMode",
        }
    }

    /// Built-in with this canonical name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(BuiltInMode::Dark),
            "light" => Some(BuiltInMode::Light),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltInMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `name` is `dark` or `light`
pub fn is_built_in(name: &str) -> bool {
    BuiltInMode::from_name(name).is_some()
}

impl Configuration {
    fn mirror_slot(&mut self, mode: BuiltInMode) -> &mut Option<ModeCollection> {
        match mode {
            BuiltInMode::Dark => &mut self.dark_mode,
            BuiltInMode::Light => &mut self.light_mode,
        }
    }

    /// Legacy mirror for `mode`
    pub fn mirror(&self, mode: BuiltInMode) -> Option<&ModeCollection> {
        match mode {
            BuiltInMode::Dark => self.dark_mode.as_ref(),
            BuiltInMode::Light => self.light_mode.as_ref(),
        }
    }

    /// Refresh the mirror for `touched` if it names a built-in mode
    pub(crate) fn sync_mirror(&mut self, touched: &str) {
        if let Some(mode) = BuiltInMode::from_name(touched) {
            let canonical = self.modes.get(mode.name()).cloned();
            tracing::trace!("Syncing {} mirror", mode.legacy_field());
            *self.mirror_slot(mode) = canonical;
        }
    }

    /// Refresh both mirrors
    pub(crate) fn sync_all_mirrors(&mut self) {
        for mode in BuiltInMode::ALL {
            self.sync_mirror(mode.name());
        }
    }

    /// Whether every present mirror equals its canonical mode
    pub fn mirrors_consistent(&self) -> bool {
        BuiltInMode::ALL.iter().all(|&mode| match self.mirror(mode) {
            Some(mirror) => self.modes.get(mode.name()) == Some(mirror),
            None => true,
        })
    }
}
