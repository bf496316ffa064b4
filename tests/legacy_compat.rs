//! Legacy document compatibility tests
//!
//! Documents written by older clients only carry `darkMode`/`lightMode`.
//! They must stay readable, and every write must leave those fields usable
//! by such clients.

use palette_core::{ColorDraft, ManualClock, PaletteError, PaletteService};
use serde_json::{json, Value};
use std::sync::Arc;
use storage::{BlobStore, KvConfig, KvStore, MemoryStore};
use tempfile::TempDir;

fn legacy_document() -> Value {
    json!({
        "darkMode": {
            "mode": "dark",
            "colors": [
                {"id": "dark-primary", "name": "Primary Background",
                 "color": {"hex": "#020817", "rgb": "rgb(2, 8, 23)"}},
                {"id": "dark-hover", "name": "Interactive Purple",
                 "color": {"hex": "#A854F7", "rgb": "rgb(168, 84, 247)"},
                 "isHoverCard": true,
                 "hoverState": {"hex": "#A854F7", "rgb": "rgb(168, 84, 247)",
                                "hoverHex": "#D8B3FE", "hoverRgb": "rgb(216, 179, 254)"}}
            ]
        },
        "lightMode": {
            "mode": "light",
            "colors": [
                {"id": "light-primary", "name": "Primary Background",
                 "color": {"hex": "#FFFFFF", "rgb": "rgb(255, 255, 255)"}}
            ]
        }
    })
}

async fn stored(store: &dyn BlobStore) -> Value {
    let raw = store.get("colors-choices").await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

async fn store_legacy(store: &dyn BlobStore) {
    let raw = legacy_document().to_string();
    store.set("colors-choices", &raw).await.unwrap();
}

/// A legacy-only document reads back in canonical shape with mirrors intact
#[tokio::test]
async fn test_legacy_document_reads_canonically() {
    let store = Arc::new(MemoryStore::new());
    store_legacy(store.as_ref()).await;
    let service = PaletteService::new(store.clone());

    let blob = service.read_configuration().await.unwrap();
    let expected = legacy_document();
    let as_json = serde_json::to_value(&blob).unwrap();
    assert_eq!(as_json["modes"]["dark"], expected["darkMode"]);
    assert_eq!(as_json["modes"]["light"], expected["lightMode"]);
    assert_eq!(as_json["darkMode"], expected["darkMode"]);
    assert_eq!(as_json["lightMode"], expected["lightMode"]);

    // Reads never write
    assert_eq!(stored(store.as_ref()).await, expected);
}

/// Mutating a legacy document upgrades it and keeps legacy readers working
#[tokio::test]
async fn test_mutation_keeps_mirrors_for_old_readers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.db");
    let config = KvConfig::new(path.to_string_lossy().to_string());
    let store: Arc<dyn BlobStore> = Arc::new(KvStore::new(config).unwrap());
    store_legacy(store.as_ref()).await;

    let service = PaletteService::new(store.clone())
        .with_clock(Arc::new(ManualClock::new(1_700_000_000_000)));

    let secondary = ColorDraft::new("#F8FAFC", "rgb(248, 250, 252)").named("Secondary");
    let entry = service.add_color("light", secondary).await.unwrap();
    assert_eq!(entry.id, "light-1700000000000");

    service
        .update_color("dark-primary", ColorDraft::new("#010101", "rgb(1, 1, 1)"))
        .await
        .unwrap();

    let doc = stored(store.as_ref()).await;
    assert_eq!(doc["lightMode"], doc["modes"]["light"]);
    assert_eq!(doc["darkMode"], doc["modes"]["dark"]);
    assert_eq!(doc["lightMode"]["colors"][1]["id"], "light-1700000000000");
    assert_eq!(doc["darkMode"]["colors"][0]["color"]["hex"], "#010101");
    // Untouched entries keep their position
    assert_eq!(doc["darkMode"]["colors"][1]["id"], "dark-hover");

    service.close().await.unwrap();
}

/// Custom modes never leak into the legacy fields
#[tokio::test]
async fn test_custom_mode_leaves_legacy_fields() {
    let store = Arc::new(MemoryStore::new());
    store_legacy(store.as_ref()).await;
    let service = PaletteService::new(store.clone()).with_clock(Arc::new(ManualClock::new(9)));

    let name = service
        .create_mode("High Contrast", Vec::new())
        .await
        .unwrap();
    let yellow = ColorDraft::new("#FFFF00", "rgb(255, 255, 0)");
    service.add_color(&name, yellow).await.unwrap();

    let doc = stored(store.as_ref()).await;
    assert_eq!(doc["darkMode"], legacy_document()["darkMode"]);
    assert_eq!(doc["lightMode"], legacy_document()["lightMode"]);
    let added = &doc["modes"]["high_contrast"]["colors"][0];
    assert_eq!(added["id"], "high_contrast-9");
}

/// A document with only one legacy field counts as absent
#[tokio::test]
async fn test_half_legacy_document_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let half = json!({"darkMode": legacy_document()["darkMode"].clone()}).to_string();
    store.set("colors-choices", &half).await.unwrap();
    let service = PaletteService::new(store);

    assert!(service.list_modes().await.unwrap_err().is_not_found());
    let black = ColorDraft::new("#000", "rgb(0, 0, 0)");
    assert!(matches!(
        service.add_color("dark", black).await,
        Err(PaletteError::NotFound(_))
    ));
}

/// Replacing with a legacy document stores the dual shape
#[tokio::test]
async fn test_replace_with_legacy_document() {
    let store = Arc::new(MemoryStore::new());
    let service = PaletteService::new(store.clone());

    let legacy = legacy_document();
    service.replace_configuration(legacy).await.unwrap();

    let doc = stored(store.as_ref()).await;
    assert_eq!(doc["modes"]["dark"], legacy_document()["darkMode"]);
    assert_eq!(doc["darkMode"], legacy_document()["darkMode"]);
}
