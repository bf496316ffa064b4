//! Mode registry
//!
//! Creates, renames, and deletes mode collections. Names are sanitized on the
//! way in and the built-in `dark`/`light` modes can be neither deleted nor
//! renamed.

use std::collections::{BTreeMap, HashSet};

use crate::clock::Clock;
use crate::error::{PaletteError, Result};
use crate::index::ColorIndex;
use crate::model::{ColorEntry, Configuration, ModeCollection};
use crate::reconcile::validate_entry;
use crate::sync::is_built_in;

/// Canonical form of a user-supplied mode name.
///
/// Trims, lower-cases, and replaces every character outside `[a-z0-9_-]`
/// with `_`.
pub fn sanitize_mode_name(requested: &str) -> String {
    requested
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

fn sanitize_checked(requested: &str) -> Result<String> {
    let name = sanitize_mode_name(requested);
    if name.is_empty() {
        tracing::warn!("Rejected empty mode name {:?}", requested);
        return Err(PaletteError::Validation("Mode name must not be empty".to_string()));
    }
    Ok(name)
}

impl Configuration {
    /// Every mode by name
    pub fn list_modes(&self) -> &BTreeMap<String, ModeCollection> {
        &self.modes
    }

    /// One mode, or `NotFound`
    pub fn get_mode(&self, name: &str) -> Result<&ModeCollection> {
        self.modes
            .get(name)
            .ok_or_else(|| PaletteError::mode_not_found(name))
    }

    /// Create a mode under the sanitized form of `requested`, returning the
    /// final name.
    ///
    /// An existing mode with the same name is only a conflict if it holds
    /// colors; an empty one is replaced. Entries in `initial` with an empty
    /// id are assigned one.
    pub fn create_mode(
        &mut self,
        requested: &str,
        initial: Vec<ColorEntry>,
        clock: &dyn Clock,
    ) -> Result<String> {
        let name = sanitize_checked(requested)?;

        if self.modes.get(&name).is_some_and(|mode| !mode.is_empty()) {
            return Err(PaletteError::Conflict(format!("Mode \"{name}\" already exists")));
        }

        let colors = self.admit_colors(&name, initial, clock)?;
        self.install_colors(&name, colors);

        tracing::debug!("Created mode {} (requested {:?})", name, requested);
        Ok(name)
    }

    /// Rename `old_name` to the sanitized form of `new_name`, returning the
    /// final name
    pub fn rename_mode(&mut self, old_name: &str, new_name: &str) -> Result<String> {
        if !self.modes.contains_key(old_name) {
            return Err(PaletteError::mode_not_found(old_name));
        }
        let name = sanitize_checked(new_name)?;
        if name == old_name {
            return Ok(name);
        }
        if is_built_in(old_name) {
            return Err(PaletteError::Forbidden(format!(
                "Cannot rename built-in mode \"{old_name}\""
            )));
        }
        if self.modes.contains_key(&name) {
            return Err(PaletteError::Conflict(format!("Mode \"{name}\" already exists")));
        }

        if let Some(mut mode) = self.modes.remove(old_name) {
            mode.mode = name.clone();
            self.modes.insert(name.clone(), mode);
        }
        // Map order decides which duplicate id wins, so re-derive it
        self.index = ColorIndex::build(&self.modes);
        self.sync_mirror(&name);

        tracing::debug!("Renamed mode {} to {}", old_name, name);
        Ok(name)
    }

    /// Remove a custom mode, returning it
    pub fn delete_mode(&mut self, name: &str) -> Result<ModeCollection> {
        if is_built_in(name) {
            return Err(PaletteError::Forbidden(format!("Cannot delete built-in mode \"{name}\"")));
        }
        let removed = self
            .modes
            .remove(name)
            .ok_or_else(|| PaletteError::mode_not_found(name))?;

        if self.index.has_shadowed() {
            self.index = ColorIndex::build(&self.modes);
        } else {
            self.index.remove_mode(name);
        }

        tracing::debug!("Deleted mode {} ({} colors)", name, removed.colors.len());
        Ok(removed)
    }

    /// Replace the whole color sequence of `name`
    pub fn replace_mode_colors(
        &mut self,
        name: &str,
        colors: Vec<ColorEntry>,
        clock: &dyn Clock,
    ) -> Result<&ModeCollection> {
        if !self.modes.contains_key(name) {
            return Err(PaletteError::mode_not_found(name));
        }
        let colors = self.admit_colors(name, colors, clock)?;
        self.install_colors(name, colors);

        tracing::debug!("Replaced colors of mode {}", name);
        self.get_mode(name)
    }

    /// Validate colors bound for `mode_name` and fill in missing ids.
    ///
    /// Ids may repeat those already in `mode_name`, since its colors are about
    /// to be replaced, but not those of any other mode or each other.
    /// Explicit ids are claimed before any id is generated.
    fn admit_colors(
        &self,
        mode_name: &str,
        mut entries: Vec<ColorEntry>,
        clock: &dyn Clock,
    ) -> Result<Vec<ColorEntry>> {
        let elsewhere = |id: &str| self.index.mode_of(id).is_some_and(|mode| mode != mode_name);

        let mut batch: HashSet<String> = HashSet::with_capacity(entries.len());
        for entry in entries.iter().filter(|e| !e.id.trim().is_empty()) {
            if elsewhere(&entry.id) || !batch.insert(entry.id.clone()) {
                return Err(PaletteError::Conflict(format!(
                    "Color id \"{}\" is already in use",
                    entry.id
                )));
            }
        }

        let mut millis = clock.now_millis();
        for entry in entries.iter_mut() {
            if entry.id.trim().is_empty() {
                entry.id = loop {
                    let candidate = format!("{mode_name}-{millis}");
                    millis += 1;
                    if !batch.contains(&candidate) && !elsewhere(&candidate) {
                        break candidate;
                    }
                };
                batch.insert(entry.id.clone());
            }
            validate_entry(entry)?;
        }
        Ok(entries)
    }

    fn install_colors(&mut self, name: &str, colors: Vec<ColorEntry>) {
        let shadowed = self.index.has_shadowed();
        if !shadowed {
            self.index.remove_mode(name);
            for color in &colors {
                self.index.insert(color.id.clone(), name);
            }
        }
        self.modes
            .insert(name.to_string(), ModeCollection::with_colors(name, colors));
        if shadowed {
            // A duplicate elsewhere may now be the first occurrence
            self.index = ColorIndex::build(&self.modes);
        }
        self.sync_mirror(name);
    }
}
