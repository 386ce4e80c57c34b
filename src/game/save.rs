//! Save slots: one per mode, plus a single mode-selector record.
//!
//! Loading merges the stored payload field-by-field onto a fresh default
//! template. A field that is missing, `null`, wrong-typed, or out of range
//! falls back to its default, and *only* then: a legitimately stored zero
//! survives the merge. Corrupt payloads are logged and treated as absent.
//! Save failures (quota, disabled storage) are logged and swallowed; the
//! in-memory mutation stands and play continues on best-effort durability.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::modes::ModeId;
use super::state::{GameState, Tab, UpgradeId};

/// Passive income persists only when the balance lands on a multiple of this
/// many units, to bound write frequency. Because a tick can add more than
/// one unit, the balance can step *past* a multiple without landing on it;
/// this is a best-effort periodic save, not an every-N guarantee.
pub const SAVE_EVERY_UNITS: u64 = 5;

const SLOT_KEY_PREFIX: &str = "clicklab_save_";
const MODE_KEY: &str = "clicklab_mode";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage is unavailable")]
    Unavailable,
}

/// The only capability the durable medium needs. Satisfied by browser
/// localStorage here; a remote document store would implement the same
/// surface (fire-and-forget, last write wins at the backend).
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// In-memory backend: tests, and the native (non-wasm) build.
#[derive(Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Browser localStorage backend.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KvStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

fn log_warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&msg.into());
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{msg}");
}

/// Serialized slot payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveData {
    currency: f64,
    total_earned: f64,
    currency_per_click: f64,
    currency_per_second: f64,
    currency_per_click_overridden: bool,
    currency_per_second_overridden: bool,
    upgrades: BTreeMap<&'static str, UpgradeSave>,
    active_tab: &'static str,
    admin_unlocked: bool,
    unlocked_mode: Option<&'static str>,
}

#[derive(Serialize)]
struct UpgradeSave {
    level: u32,
}

fn slot_key(mode: ModeId) -> String {
    format!("{SLOT_KEY_PREFIX}{}", mode.key())
}

// Field extractors for the merge. Each one type-checks and range-checks,
// falling back to the template value on any mismatch. Deliberately not
// `value || default`: zero is a valid stored value.

fn merge_number(payload: &Value, key: &str, min: f64, default: f64) -> f64 {
    payload
        .get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= min)
        .unwrap_or(default)
}

fn merge_bool(payload: &Value, key: &str, default: bool) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn merge_tab(payload: &Value, key: &str, default: Tab) -> Tab {
    payload
        .get(key)
        .and_then(Value::as_str)
        .and_then(Tab::from_key)
        .unwrap_or(default)
}

fn merge_mode(payload: &Value, key: &str) -> Option<ModeId> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .and_then(ModeId::from_key)
}

fn merge_levels(payload: &Value, state: &mut GameState) {
    let Some(map) = payload.get("upgrades").and_then(Value::as_object) else {
        return;
    };
    for (slug, entry) in map {
        // Unknown ids (from a newer or foreign build) are skipped.
        let Some(id) = UpgradeId::from_key(slug) else {
            continue;
        };
        let level = entry
            .get("level")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);
        state.set_level(id, level);
    }
}

/// Per-mode save slots over an injected backend.
pub struct SlotStore<S: KvStore> {
    store: S,
}

impl<S: KvStore> SlotStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read access for tests and diagnostics.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Consume the store, handing the backend back (reload simulation in
    /// tests).
    pub fn into_backend(self) -> S {
        self.store
    }

    /// Load a mode's slot. Never fails: an absent slot, a corrupt payload,
    /// or any malformed field degrades to the default template value.
    /// Every call returns an independently mutable state.
    pub fn load(&self, mode: ModeId) -> GameState {
        let mut state = GameState::new();
        let Some(raw) = self.store.get(&slot_key(mode)) else {
            return state;
        };
        let payload: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                log_warn(&format!(
                    "clicklab: discarding corrupt save for {}: {e}",
                    mode.key()
                ));
                return state;
            }
        };

        state.currency = merge_number(&payload, "currency", 0.0, state.currency);
        state.total_earned = merge_number(&payload, "totalEarned", 0.0, state.total_earned);
        state.per_click = merge_number(&payload, "currencyPerClick", 0.0, state.per_click);
        state.per_second = merge_number(&payload, "currencyPerSecond", 0.0, state.per_second);
        state.per_click_overridden =
            merge_bool(&payload, "currencyPerClickOverridden", state.per_click_overridden);
        state.per_second_overridden =
            merge_bool(&payload, "currencyPerSecondOverridden", state.per_second_overridden);
        merge_levels(&payload, &mut state);
        state.active_tab = merge_tab(&payload, "activeTab", state.active_tab);
        state.admin_unlocked = merge_bool(&payload, "adminUnlocked", state.admin_unlocked);
        state.unlocked_mode = merge_mode(&payload, "unlockedMode");
        state
    }

    /// Write a mode's slot. Failures are logged, never surfaced: the caller's
    /// in-memory state keeps the mutation and risks loss on the next reload.
    pub fn save(&mut self, mode: ModeId, state: &GameState) {
        let data = SaveData {
            currency: state.currency,
            total_earned: state.total_earned,
            currency_per_click: state.per_click,
            currency_per_second: state.per_second,
            currency_per_click_overridden: state.per_click_overridden,
            currency_per_second_overridden: state.per_second_overridden,
            upgrades: state
                .upgrades
                .iter()
                .map(|u| (u.id.key(), UpgradeSave { level: u.level }))
                .collect(),
            active_tab: state.active_tab.key(),
            admin_unlocked: state.admin_unlocked,
            unlocked_mode: state.unlocked_mode.map(|m| m.key()),
        };
        let json = match serde_json::to_string(&data) {
            Ok(j) => j,
            Err(e) => {
                log_warn(&format!("clicklab: failed to serialize save: {e}"));
                return;
            }
        };
        if let Err(e) = self.store.set(&slot_key(mode), &json) {
            log_warn(&format!(
                "clicklab: failed to persist {} slot: {e}",
                mode.key()
            ));
        }
    }

    /// The active-mode selector lives outside any slot so it survives
    /// per-mode resets and loads before any slot is read.
    pub fn load_active_mode(&self) -> ModeId {
        self.store
            .get(MODE_KEY)
            .as_deref()
            .and_then(ModeId::from_key)
            .unwrap_or_else(ModeId::default_mode)
    }

    pub fn save_active_mode(&mut self, mode: ModeId) {
        if let Err(e) = self.store.set(MODE_KEY, mode.key()) {
            log_warn(&format!("clicklab: failed to persist mode selector: {e}"));
        }
    }

    /// Full wipe: every mode's slot plus the selector. Irrecoverable.
    pub fn clear_all(&mut self) {
        for &mode in ModeId::all() {
            self.store.remove(&slot_key(mode));
        }
        self.store.remove(MODE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SlotStore<MemoryStore> {
        SlotStore::new(MemoryStore::new())
    }

    #[test]
    fn absent_slot_yields_default_template() {
        let slots = store();
        let s = slots.load(ModeId::Classic);
        assert_eq!(s.currency, 0.0);
        assert_eq!(s.per_click, 1.0);
        assert!(s.upgrades.iter().all(|u| u.level == 0));
    }

    #[test]
    fn each_load_is_independently_mutable() {
        let slots = store();
        let mut a = slots.load(ModeId::Classic);
        a.currency = 500.0;
        let b = slots.load(ModeId::Classic);
        assert_eq!(b.currency, 0.0);
    }

    #[test]
    fn round_trip_preserves_everything() {
        let mut slots = store();
        let mut s = GameState::new();
        s.currency = 123.5;
        s.total_earned = 9000.0;
        s.per_click = 6.0;
        s.per_second = 11.0;
        s.per_second_overridden = true;
        s.set_level(UpgradeId::StrongerClicks, 5);
        s.set_level(UpgradeId::ClickFarm, 2);
        s.active_tab = Tab::Stats;
        s.admin_unlocked = true;
        s.unlocked_mode = Some(ModeId::Neon);

        slots.save(ModeId::Classic, &s);
        let r = slots.load(ModeId::Classic);

        assert_eq!(r.currency, 123.5);
        assert_eq!(r.total_earned, 9000.0);
        assert_eq!(r.per_click, 6.0);
        assert_eq!(r.per_second, 11.0);
        assert!(!r.per_click_overridden);
        assert!(r.per_second_overridden);
        assert_eq!(r.level_of(UpgradeId::StrongerClicks), 5);
        assert_eq!(r.level_of(UpgradeId::ClickFarm), 2);
        assert_eq!(r.level_of(UpgradeId::AutoClicker), 0);
        assert_eq!(r.active_tab, Tab::Stats);
        assert!(r.admin_unlocked);
        assert_eq!(r.unlocked_mode, Some(ModeId::Neon));
    }

    #[test]
    fn stored_zero_survives_the_merge() {
        // An admin-overridden 0.0 is a legitimate value; the merge must not
        // "backfill" it to the template default the way falsy-coalescing would.
        let mut slots = store();
        let mut s = GameState::new();
        s.per_click = 0.0;
        s.per_click_overridden = true;
        s.per_second = 0.0;
        slots.save(ModeId::Classic, &s);

        let r = slots.load(ModeId::Classic);
        assert_eq!(r.per_click, 0.0);
        assert!(r.per_click_overridden);
        assert_eq!(r.per_second, 0.0);
    }

    #[test]
    fn old_payload_backfills_missing_fields() {
        let mut slots = store();
        // A payload from before override flags and modes existed.
        slots
            .store
            .set(
                &slot_key(ModeId::Classic),
                r#"{"currency": 42.0, "totalEarned": 100.0,
                    "upgrades": {"stronger_clicks": {"level": 3}}}"#,
            )
            .unwrap();

        let s = slots.load(ModeId::Classic);
        assert_eq!(s.currency, 42.0);
        assert_eq!(s.total_earned, 100.0);
        assert_eq!(s.level_of(UpgradeId::StrongerClicks), 3);
        assert_eq!(s.per_click, 1.0);
        assert!(!s.per_click_overridden);
        assert_eq!(s.active_tab, Tab::Clicker);
        assert_eq!(s.unlocked_mode, None);
    }

    #[test]
    fn wrong_typed_fields_fall_back_individually() {
        let mut slots = store();
        slots
            .store
            .set(
                &slot_key(ModeId::Classic),
                r#"{"currency": "lots", "totalEarned": null,
                    "currencyPerClick": 3.0,
                    "currencyPerSecondOverridden": "yes",
                    "activeTab": 7,
                    "upgrades": {"auto_clicker": {"level": "nine"},
                                 "click_servo": {"level": 2}}}"#,
            )
            .unwrap();

        let s = slots.load(ModeId::Classic);
        assert_eq!(s.currency, 0.0); // wrong type -> default
        assert_eq!(s.total_earned, 0.0); // null -> default
        assert_eq!(s.per_click, 3.0); // valid field still honored
        assert!(!s.per_second_overridden);
        assert_eq!(s.active_tab, Tab::Clicker);
        assert_eq!(s.level_of(UpgradeId::AutoClicker), 0);
        assert_eq!(s.level_of(UpgradeId::ClickServo), 2);
    }

    #[test]
    fn negative_and_non_finite_numbers_rejected() {
        let mut slots = store();
        slots
            .store
            .set(
                &slot_key(ModeId::Classic),
                r#"{"currency": -5.0, "currencyPerSecond": 1e999}"#,
            )
            .unwrap();
        let s = slots.load(ModeId::Classic);
        assert_eq!(s.currency, 0.0);
        assert_eq!(s.per_second, 0.0);
    }

    #[test]
    fn corrupt_payload_falls_back_to_default() {
        let mut slots = store();
        slots
            .store
            .set(&slot_key(ModeId::Classic), "{not json at all")
            .unwrap();
        let s = slots.load(ModeId::Classic);
        assert_eq!(s.currency, 0.0);
        assert_eq!(s.per_click, 1.0);
    }

    #[test]
    fn unknown_upgrade_ids_ignored() {
        let mut slots = store();
        slots
            .store
            .set(
                &slot_key(ModeId::Classic),
                r#"{"upgrades": {"quantum_mouse": {"level": 99},
                                 "click_farm": {"level": 4}}}"#,
            )
            .unwrap();
        let s = slots.load(ModeId::Classic);
        assert_eq!(s.level_of(UpgradeId::ClickFarm), 4);
        assert_eq!(s.upgrades.len(), UpgradeId::all().len());
    }

    #[test]
    fn slots_are_per_mode() {
        let mut slots = store();
        let mut classic = GameState::new();
        classic.currency = 10.0;
        let mut neon = GameState::new();
        neon.currency = 99.0;

        slots.save(ModeId::Classic, &classic);
        slots.save(ModeId::Neon, &neon);

        assert_eq!(slots.load(ModeId::Classic).currency, 10.0);
        assert_eq!(slots.load(ModeId::Neon).currency, 99.0);
    }

    #[test]
    fn mode_selector_round_trip() {
        let mut slots = store();
        assert_eq!(slots.load_active_mode(), ModeId::Classic);
        slots.save_active_mode(ModeId::Neon);
        assert_eq!(slots.load_active_mode(), ModeId::Neon);
    }

    #[test]
    fn garbage_mode_selector_falls_back_to_default() {
        let mut slots = store();
        slots.store.set(MODE_KEY, "vaporwave").unwrap();
        assert_eq!(slots.load_active_mode(), ModeId::Classic);
    }

    #[test]
    fn clear_all_wipes_slots_and_selector() {
        let mut slots = store();
        let mut s = GameState::new();
        s.currency = 77.0;
        slots.save(ModeId::Classic, &s);
        slots.save(ModeId::Neon, &s);
        slots.save_active_mode(ModeId::Neon);

        slots.clear_all();

        assert_eq!(slots.load(ModeId::Classic).currency, 0.0);
        assert_eq!(slots.load(ModeId::Neon).currency, 0.0);
        assert_eq!(slots.load_active_mode(), ModeId::Classic);
    }

    /// A backend whose writes always fail, for the swallow-and-log path.
    struct FullStore;

    impl KvStore for FullStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) {}
    }

    #[test]
    fn write_failure_does_not_panic_or_surface() {
        let mut slots = SlotStore::new(FullStore);
        let s = GameState::new();
        slots.save(ModeId::Classic, &s);
        slots.save_active_mode(ModeId::Neon);
        // Nothing persisted; load degrades to the template.
        assert_eq!(slots.load(ModeId::Classic).currency, 0.0);
        assert_eq!(slots.load_active_mode(), ModeId::Classic);
    }

    #[test]
    fn last_write_wins_across_two_contexts() {
        // Two engines (tabs) sharing one backend key: whichever save lands
        // last wins wholesale, regardless of which mutation was logically
        // newer. Accepted limitation of the fire-and-forget model.
        let mut slots = store();

        let mut tab_a = slots.load(ModeId::Classic);
        let mut tab_b = slots.load(ModeId::Classic);

        tab_a.currency = 100.0;
        tab_b.currency = 1.0;

        slots.save(ModeId::Classic, &tab_a);
        slots.save(ModeId::Classic, &tab_b);

        assert_eq!(slots.load(ModeId::Classic).currency, 1.0);
    }
}
