//! Palette engine for Palette Keeper
//!
//! Stores named color modes behind a single persistence key. Documents
//! written by older clients (fixed `darkMode`/`lightMode` fields) are
//! normalized on every read, and every write keeps those fields in step with
//! the canonical `modes` map so older readers continue to work.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod colors;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod modes;
pub mod reconcile;
pub mod seed;
pub mod service;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PaletteConfig, DEFAULT_STORAGE_KEY, SECRET_KEY};
pub use error::{Missing, PaletteError, PersistenceFailure, Result};
pub use model::{ColorDraft, ColorEntry, ColorValue, Configuration, HoverState, ModeCollection};
pub use modes::sanitize_mode_name;
pub use reconcile::{normalize, project, StoredBlob};
pub use seed::default_configuration;
pub use service::{InitOutcome, PaletteService};
pub use sync::{is_built_in, BuiltInMode};
