//! Default palette written by `initialize`

use crate::model::{ColorDraft, ColorEntry, Configuration, ModeCollection};
use crate::reconcile::{normalize, StoredBlob};

struct SeedColor {
    slot: &'static str,
    name: &'static str,
    hex: &'static str,
    rgb: &'static str,
    hover: Option<(&'static str, &'static str)>,
}

const fn plain(
    slot: &'static str,
    name: &'static str,
    hex: &'static str,
    rgb: &'static str,
) -> SeedColor {
    SeedColor {
        slot,
        name,
        hex,
        rgb,
        hover: None,
    }
}

const DARK: [SeedColor; 6] = [
    plain("primary", "Primary Background", "#020817", "rgb(2, 8, 23)"),
    plain(
        "secondary",
        "Secondary Background",
        "#1E293B",
        "rgb(30, 41, 59)",
    ),
    plain(
        "tertiary",
        "Tertiary Background",
        "#07152E",
        "rgb(7, 21, 46)",
    ),
    plain("muted", "Muted Text", "#94A3B8", "rgb(148, 163, 184)"),
    plain("accent", "Accent Blue", "#3B81F6", "rgb(59, 129, 246)"),
    SeedColor {
        slot: "hover",
        name: "Interactive Purple",
        hex: "#A854F7",
        rgb: "rgb(168, 84, 247)",
        hover: Some(("#D8B3FE", "rgb(216, 179, 254)")),
    },
];

const LIGHT: [SeedColor; 6] = [
    plain(
        "primary",
        "Primary Background",
        "#FFFFFF",
        "rgb(255, 255, 255)",
    ),
    plain(
        "secondary",
        "Secondary Background",
        "#F8FAFC",
        "rgb(248, 250, 252)",
    ),
    plain(
        "tertiary",
        "Tertiary Background",
        "#F1F5F9",
        "rgb(241, 245, 249)",
    ),
    plain("muted", "Muted Text", "#64748B", "rgb(100, 116, 139)"),
    plain("accent", "Accent Blue", "#2563EB", "rgb(37, 99, 235)"),
    SeedColor {
        slot: "hover",
        name: "Interactive Purple",
        hex: "#8B5CF6",
        rgb: "rgb(139, 92, 246)",
        hover: Some(("#C4B5FD", "rgb(196, 181, 253)")),
    },
];

fn build_mode(mode: &str, seeds: &[SeedColor]) -> ModeCollection {
    let colors: Vec<ColorEntry> = seeds
        .iter()
        .map(|seed| {
            let draft = ColorDraft::new(seed.hex, seed.rgb).named(seed.name);
            let draft = match seed.hover {
                Some((hover_hex, hover_rgb)) => draft.with_hover(hover_hex, hover_rgb),
                None => draft,
            };
            draft.into_entry(format!("{mode}-{}", seed.slot))
        })
        .collect();
    ModeCollection::with_colors(mode, colors)
}

/// The stock dark and light palettes
pub fn default_configuration() -> Configuration {
    let legacy = StoredBlob {
        modes: None,
        dark_mode: Some(build_mode("dark", &DARK)),
        light_mode: Some(build_mode("light", &LIGHT)),
    };
    // Both legacy fields are present, so this always yields a configuration
    normalize(legacy).unwrap_or_default()
}
