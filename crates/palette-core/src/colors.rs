//! Color registry
//!
//! Adds, updates, and removes individual colors. Ids take the form
//! `{mode}-{millis}` and are unique across the whole configuration; lookups
//! by id go through the [`ColorIndex`](crate::index::ColorIndex).
//!
//! Only presence is validated. A malformed or blank hex string is stored
//! verbatim.

use crate::clock::Clock;
use crate::error::{PaletteError, Result};
use crate::model::{ColorDraft, ColorEntry, ColorValue, Configuration, HoverState};

/// Check the color fields shared by drafts and stored entries
pub fn validate_fields(
    color: &ColorValue,
    is_hover_card: Option<bool>,
    hover_state: Option<&HoverState>,
) -> Result<()> {
    if color.hex.is_empty() || color.rgb.is_empty() {
        tracing::warn!("Rejected color without hex or rgb");
        return Err(PaletteError::Validation(
            "Invalid color data: missing required fields (hex, rgb)".to_string(),
        ));
    }

    if is_hover_card == Some(true) {
        let complete = hover_state.is_some_and(|h| {
            [&h.hex, &h.rgb, &h.hover_hex, &h.hover_rgb]
                .iter()
                .all(|field| !field.is_empty())
        });
        if !complete {
            tracing::warn!("Rejected hover card with incomplete hover state");
            return Err(PaletteError::Validation(
                "Invalid color data: hover cards need hex, rgb, hoverHex, and hoverRgb".to_string(),
            ));
        }
    }

    Ok(())
}

/// Check a caller-supplied draft
pub fn validate_draft(draft: &ColorDraft) -> Result<()> {
    validate_fields(
        &draft.color,
        draft.is_hover_card,
        draft.hover_state.as_ref(),
    )
}

impl Configuration {
    /// Next free id for `mode_name`, starting from the clock's current time
    pub(crate) fn next_color_id(&self, mode_name: &str, clock: &dyn Clock) -> String {
        let mut millis = clock.now_millis();
        loop {
            let id = format!("{mode_name}-{millis}");
            if !self.index.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }

    /// Append a new color to `mode_name`.
    ///
    /// The mode must already exist; colors never create modes.
    pub fn add_color(
        &mut self,
        mode_name: &str,
        draft: ColorDraft,
        clock: &dyn Clock,
    ) -> Result<ColorEntry> {
        if !self.modes.contains_key(mode_name) {
            return Err(PaletteError::mode_not_found(mode_name));
        }
        validate_draft(&draft)?;

        let id = self.next_color_id(mode_name, clock);
        let entry = draft.into_entry(id);

        if let Some(mode) = self.modes.get_mut(mode_name) {
            mode.colors.push(entry.clone());
        }
        self.index.insert(entry.id.clone(), mode_name);
        self.sync_mirror(mode_name);

        tracing::debug!("Added color {} to mode {}", entry.id, mode_name);
        Ok(entry)
    }

    /// Replace the color with `id` in place, keeping its id and position
    pub fn update_color(&mut self, id: &str, draft: ColorDraft) -> Result<ColorEntry> {
        validate_draft(&draft)?;

        let (mode_name, position) = self.locate(id)?;
        let entry = draft.into_entry(id);

        if let Some(mode) = self.modes.get_mut(&mode_name) {
            mode.colors[position] = entry.clone();
        }
        self.sync_mirror(&mode_name);

        tracing::debug!("Updated color {} in mode {}", id, mode_name);
        Ok(entry)
    }

    /// Remove the color with `id`, returning it
    pub fn delete_color(&mut self, id: &str) -> Result<ColorEntry> {
        let (mode_name, position) = self.locate(id)?;

        let removed = match self.modes.get_mut(&mode_name) {
            Some(mode) => mode.colors.remove(position),
            None => return Err(PaletteError::color_not_found(id)),
        };
        self.index.remove(id);
        if self.index.has_shadowed() {
            // A later duplicate of this id may now be the first occurrence
            self.index = crate::index::ColorIndex::build(&self.modes);
        }
        self.sync_mirror(&mode_name);

        tracing::debug!("Deleted color {} from mode {}", id, mode_name);
        Ok(removed)
    }

    fn locate(&self, id: &str) -> Result<(String, usize)> {
        let mode_name = self
            .index
            .mode_of(id)
            .ok_or_else(|| PaletteError::color_not_found(id))?;
        let position = self
            .modes
            .get(mode_name)
            .and_then(|mode| mode.position_of(id))
            .ok_or_else(|| PaletteError::color_not_found(id))?;
        Ok((mode_name.to_string(), position))
    }
}
