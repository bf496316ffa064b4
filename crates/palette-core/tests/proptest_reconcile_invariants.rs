//! Property-based invariant tests for reconciliation and the registries.
//!
//! 1. normalize ∘ project is idempotent for legacy and canonical documents
//! 2. Projection always carries mirrors equal to the canonical built-ins
//! 3. Arbitrary operation sequences keep ids unique and mirrors in step

use palette_core::{
    normalize, project, ColorDraft, ColorEntry, Configuration, ManualClock, ModeCollection,
    StoredBlob,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

// ── Strategies ──────────────────────────────────────────────────────────

fn entry_strategy() -> impl Strategy<Value = ColorEntry> {
    let id = "[a-z]{1,3}-[0-9]{1,2}";
    (id, any::<[u8; 3]>(), any::<bool>()).prop_map(|(id, [r, g, b], hover)| {
        let hex = format!("#{r:02x}{g:02x}{b:02x}");
        let draft = ColorDraft::new(hex, format!("rgb({r}, {g}, {b})"));
        let draft = if hover {
            draft.with_hover("#ffffff", "rgb(255, 255, 255)")
        } else {
            draft
        };
        draft.into_entry(id)
    })
}

fn mode_strategy(name: &'static str) -> impl Strategy<Value = ModeCollection> {
    let colors = prop::collection::vec(entry_strategy(), 0..5);
    (any::<bool>(), colors).prop_map(move |(named, colors)| {
        ModeCollection::with_colors(if named { name } else { "" }, colors)
    })
}

fn legacy_strategy() -> impl Strategy<Value = StoredBlob> {
    (mode_strategy("dark"), mode_strategy("light")).prop_map(|(dark, light)| StoredBlob {
        modes: None,
        dark_mode: Some(dark),
        light_mode: Some(light),
    })
}

fn canonical_strategy() -> impl Strategy<Value = StoredBlob> {
    let names = prop::sample::select(vec!["dark", "light", "sunset", "ocean", "forest"]);
    (
        prop::collection::vec((names, mode_strategy("")), 0..5),
        prop::option::of(mode_strategy("dark")),
    )
        .prop_map(|(modes, stale_dark)| {
            let modes: BTreeMap<String, ModeCollection> = modes
                .into_iter()
                .map(|(name, mode)| (name.to_string(), mode))
                .collect();
            StoredBlob {
                modes: Some(modes),
                dark_mode: stale_dark,
                light_mode: None,
            }
        })
}

fn blob_strategy() -> impl Strategy<Value = StoredBlob> {
    prop_oneof![legacy_strategy(), canonical_strategy()]
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Update(usize),
    DeleteColor(usize),
    CreateMode(String, usize),
    RenameMode(usize, String),
    DeleteMode(usize),
    Tick,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..8).prop_map(Op::Add),
        1 => (0usize..32).prop_map(Op::Update),
        2 => (0usize..32).prop_map(Op::DeleteColor),
        1 => ("[A-Za-z !]{0,8}", 0usize..3).prop_map(|(name, n)| Op::CreateMode(name, n)),
        1 => (0usize..8, "[a-z]{1,6}").prop_map(|(i, name)| Op::RenameMode(i, name)),
        1 => (0usize..8).prop_map(Op::DeleteMode),
        1 => Just(Op::Tick),
    ]
}

fn nth_mode(config: &Configuration, i: usize) -> Option<String> {
    let len = config.modes().len();
    (len > 0).then(|| config.modes().keys().nth(i % len).cloned()).flatten()
}

fn nth_color(config: &Configuration, i: usize) -> Option<String> {
    let ids: Vec<&String> = config
        .modes()
        .values()
        .flat_map(|m| m.colors.iter().map(|c| &c.id))
        .collect();
    (!ids.is_empty()).then(|| ids[i % ids.len()].clone())
}

fn apply(config: &mut Configuration, clock: &ManualClock, op: &Op) {
    let draft = ColorDraft::new("#123456", "rgb(18, 52, 86)");
    // Rejections are part of the sequence; only the invariants matter
    match op {
        Op::Add(i) => {
            if let Some(mode) = nth_mode(config, *i) {
                let _ = config.add_color(&mode, draft, clock);
            }
        }
        Op::Update(i) => {
            if let Some(id) = nth_color(config, *i) {
                let _ = config.update_color(&id, draft.named("updated"));
            }
        }
        Op::DeleteColor(i) => {
            if let Some(id) = nth_color(config, *i) {
                let _ = config.delete_color(&id);
            }
        }
        Op::CreateMode(name, n) => {
            let initial = (0..*n).map(|_| draft.clone().into_entry("")).collect();
            let _ = config.create_mode(name, initial, clock);
        }
        Op::RenameMode(i, name) => {
            if let Some(mode) = nth_mode(config, *i) {
                let _ = config.rename_mode(&mode, name);
            }
        }
        Op::DeleteMode(i) => {
            if let Some(mode) = nth_mode(config, *i) {
                let _ = config.delete_mode(&mode);
            }
        }
        Op::Tick => clock.advance(1),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Reconciliation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalize_project_is_idempotent(blob in blob_strategy()) {
        if let Some(once) = normalize(blob) {
            let twice = normalize(project(&once)).unwrap();
            prop_assert_eq!(&twice, &once);
            prop_assert_eq!(normalize(project(&twice)).unwrap(), once);
        }
    }

    #[test]
    fn projection_mirrors_match_builtins(blob in blob_strategy()) {
        if let Some(config) = normalize(blob) {
            let projected = project(&config);
            let modes = projected.modes.as_ref().unwrap();
            prop_assert_eq!(projected.dark_mode.as_ref(), modes.get("dark"));
            prop_assert_eq!(projected.light_mode.as_ref(), modes.get("light"));
            prop_assert!(config.mirrors_consistent());
        }
    }

    #[test]
    fn legacy_round_trip_keeps_every_color(blob in legacy_strategy()) {
        let dark_len = blob.dark_mode.as_ref().unwrap().colors.len();
        let light_len = blob.light_mode.as_ref().unwrap().colors.len();
        let config = normalize(blob).unwrap();
        prop_assert_eq!(config.color_count(), dark_len + light_len);
        prop_assert_eq!(config.mode("dark").unwrap().mode.as_str(), "dark");
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Registry operation sequences
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn operations_keep_ids_unique_and_mirrors_synced(
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut config = palette_core::default_configuration();
        let clock = ManualClock::new(1_700_000_000_000);

        for op in &ops {
            apply(&mut config, &clock, op);

            let ids: Vec<&str> = config
                .modes()
                .values()
                .flat_map(|m| m.colors.iter().map(|c| c.id.as_str()))
                .collect();
            let unique: HashSet<&str> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len(), "duplicate id after {:?}", op);

            for id in &ids {
                prop_assert!(config.color(id).is_some(), "{} not indexed after {:?}", id, op);
            }
            prop_assert!(config.mirrors_consistent());
            prop_assert!(config.mode("dark").is_some());
            prop_assert!(config.mode("light").is_some());
        }

        let reloaded = normalize(project(&config)).unwrap();
        prop_assert_eq!(reloaded, config);
    }
}
