//! Command-line argument parsing
//!
//! Global flags pick the store; subcommands map one-to-one onto palette
//! operations.

use clap::{Args, Parser, Subcommand};
use palette_core::{ColorDraft, PaletteConfig, DEFAULT_STORAGE_KEY};
use storage::{BackendKind, StorageBackend};

/// Manage a stored color palette
#[derive(Parser, Debug)]
#[command(name = "palette", version, about = "Manage a stored color palette")]
pub struct CliArgs {
    /// Storage backend: sled, sqlite, or memory
    #[arg(long, env = "PALETTE_BACKEND", default_value = "sled")]
    pub backend: BackendKind,

    /// Database path (defaults depend on the backend)
    #[arg(long, env = "PALETTE_PATH", value_name = "FILE")]
    pub path: Option<String>,

    /// Key the palette document is stored under
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed the default palette if nothing is stored
    Init,
    /// Print the stored configuration
    Show,
    /// Replace the stored configuration with a JSON file
    Import {
        /// File holding the new configuration
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Delete the stored configuration
    Wipe,
    /// List every mode
    Modes,
    /// Work with a single mode
    #[command(subcommand)]
    Mode(ModeCommand),
    /// Work with a single color
    #[command(subcommand)]
    Color(ColorCommand),
}

/// `palette mode ...`
#[derive(Subcommand, Debug)]
pub enum ModeCommand {
    /// Print one mode
    Get { name: String },
    /// Create a mode
    Create {
        name: String,
        /// JSON array of initial color entries
        #[arg(long, value_name = "JSON")]
        colors: Option<String>,
    },
    /// Rename a custom mode
    Rename { old: String, new: String },
    /// Delete a custom mode
    Delete { name: String },
    /// Replace every color in a mode
    SetColors {
        name: String,
        /// JSON array of color entries
        #[arg(value_name = "JSON")]
        colors: String,
    },
}

/// `palette color ...`
#[derive(Subcommand, Debug)]
pub enum ColorCommand {
    /// Append a color to a mode
    Add {
        mode: String,
        #[command(flatten)]
        fields: ColorFields,
    },
    /// Replace a color's fields
    Update {
        id: String,
        #[command(flatten)]
        fields: ColorFields,
    },
    /// Delete a color
    Delete { id: String },
}

/// Color fields shared by `add` and `update`
#[derive(Args, Debug, Clone)]
pub struct ColorFields {
    /// Hex notation, e.g. #112233
    #[arg(long)]
    pub hex: String,

    /// Functional notation, e.g. "rgb(17, 34, 51)"
    #[arg(long)]
    pub rgb: String,

    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Hovered hex; makes the color a hover card
    #[arg(long, requires = "hover_rgb")]
    pub hover_hex: Option<String>,

    /// Hovered rgb
    #[arg(long, requires = "hover_hex")]
    pub hover_rgb: Option<String>,
}

impl ColorFields {
    /// Convert into a draft
    pub fn into_draft(self) -> ColorDraft {
        let mut draft = ColorDraft::new(self.hex, self.rgb);
        if let Some(name) = self.name {
            draft = draft.named(name);
        }
        match (self.hover_hex, self.hover_rgb) {
            (Some(hover_hex), Some(hover_rgb)) => draft.with_hover(hover_hex, hover_rgb),
            _ => draft,
        }
    }
}

impl CliArgs {
    /// Storage backend described by the flags
    pub fn storage_backend(&self) -> StorageBackend {
        let path = self.path.clone().unwrap_or_else(|| match self.backend {
            BackendKind::Sqlite => "palette.db".to_string(),
            _ => "palette_kv.db".to_string(),
        });
        StorageBackend::from_kind(self.backend, path)
    }

    /// Palette settings described by the flags
    pub fn palette_config(&self) -> PaletteConfig {
        PaletteConfig::new().with_storage_key(self.key.clone())
    }
}
