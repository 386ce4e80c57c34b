//! The progression engine: owns the canonical state, applies every mutation,
//! and write-through persists after each successful operation.
//!
//! Validation failures are returned as typed errors for the UI to display;
//! they never partially apply. Storage trouble is absorbed inside the slot
//! store; gameplay continues on the in-memory state.

use thiserror::Error;

use super::codes::{self, CodeEffect};
use super::cost::next_cost;
use super::modes::{self, ModeId, ModeRegistry};
use super::save::{KvStore, SlotStore, SAVE_EVERY_UNITS};
use super::state::{GameState, Tab, UpgradeId};

/// The two derived stats an admin override can freeze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    PerClick,
    PerSecond,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("not enough clicks (need {needed}, have {have})")]
    InsufficientFunds { needed: u64, have: u64 },
    #[error("no such upgrade")]
    UnknownUpgrade,
    #[error("invalid value: {0}")]
    InvalidInput(String),
    #[error("unknown code")]
    InvalidCode,
    #[error("enter a code first")]
    EmptyInput,
}

/// What a successful operation did, for the UI message line.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Clicked { gained: f64 },
    TickApplied { gained: f64 },
    Purchased { id: UpgradeId, cost: u64, level: u32 },
    StatSet { stat: Stat, value: f64 },
    LevelSet { id: UpgradeId, level: u32 },
    CurrencySet { value: f64 },
    CurrencyGranted { amount: f64 },
    AdminUnlocked,
    AdminAlreadyUnlocked,
    ModeUnlocked(ModeId),
    ModeAlreadyUnlocked(ModeId),
    ModeSwitched(ModeId),
    ModeUnchanged,
    TabShown(Tab),
    WasReset,
}

pub struct Engine<S: KvStore> {
    state: GameState,
    registry: ModeRegistry,
    slots: SlotStore<S>,
}

impl<S: KvStore> Engine<S> {
    /// Restore the active mode's profile from the store (or start fresh).
    pub fn new(store: S) -> Self {
        let slots = SlotStore::new(store);
        let active = slots.load_active_mode();
        let state = slots.load(active);
        let mut engine = Self {
            state,
            registry: ModeRegistry::new(active),
            slots,
        };
        // Heal any drift between stored derived stats and stored levels;
        // overridden stats are left exactly as loaded.
        engine.recompute_derived();
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> ModeId {
        self.registry.active()
    }

    pub fn slots(&self) -> &SlotStore<S> {
        &self.slots
    }

    /// Consume the engine, handing back the storage backend (reload
    /// simulation in tests).
    pub fn into_store(self) -> S {
        self.slots.into_backend()
    }

    /// Price of the next level, for both display and purchase.
    pub fn next_cost_of(&self, id: UpgradeId) -> u64 {
        next_cost(id.base_cost(), id.cost_multiplier(), self.state.level_of(id))
    }

    fn commit(&mut self) {
        self.slots.save(self.registry.active(), &self.state);
    }

    /// One manual press of the big button.
    pub fn click(&mut self) -> Outcome {
        let gained = self.state.per_click;
        self.state.currency += gained;
        self.state.total_earned += gained;
        self.commit();
        Outcome::Clicked { gained }
    }

    /// One clock tick of passive income. Rounded, not truncated, so a
    /// sub-1 rate of 0.5+ still pays out. Persistence here is the clock's
    /// best-effort rule: save only when the balance lands on a multiple of
    /// [`SAVE_EVERY_UNITS`] (a tick can step past one without landing).
    pub fn apply_tick(&mut self) -> Outcome {
        if self.state.per_second <= 0.0 {
            return Outcome::TickApplied { gained: 0.0 };
        }
        let gained = self.state.per_second.round();
        self.state.currency += gained;
        self.state.total_earned += gained;
        if (self.state.currency.floor() as u64) % SAVE_EVERY_UNITS == 0 {
            self.commit();
        }
        Outcome::TickApplied { gained }
    }

    /// Buy one level of an upgrade. Atomic: on any error the balance and
    /// level are untouched.
    pub fn buy(&mut self, id: UpgradeId) -> Result<Outcome, EngineError> {
        let flavor =
            modes::flavor(self.registry.active(), id).ok_or(EngineError::UnknownUpgrade)?;
        let cost = self.next_cost_of(id);
        if self.state.currency < cost as f64 {
            return Err(EngineError::InsufficientFunds {
                needed: cost,
                have: self.state.currency.floor() as u64,
            });
        }
        self.state.currency -= cost as f64;
        let level = self.state.level_of(id) + 1;
        self.state.set_level(id, level);
        // A level change re-enables derivation for the stat this upgrade feeds.
        if flavor.per_click_bonus != 0.0 {
            self.state.per_click_overridden = false;
        }
        if flavor.per_second_bonus != 0.0 {
            self.state.per_second_overridden = false;
        }
        self.recompute_derived();
        self.commit();
        Ok(Outcome::Purchased { id, cost, level })
    }

    /// Rebuild both derived stats from owned levels and the active mode's
    /// bonus table. Overridden stats keep their stored value. Idempotent.
    pub fn recompute_derived(&mut self) {
        let mode = self.registry.active();
        if !self.state.per_click_overridden {
            let bonus: f64 = self
                .state
                .upgrades
                .iter()
                .filter_map(|u| modes::flavor(mode, u.id).map(|f| (u.level, f)))
                .map(|(level, f)| level as f64 * f.per_click_bonus)
                .sum();
            self.state.per_click = 1.0 + bonus;
        }
        if !self.state.per_second_overridden {
            let bonus: f64 = self
                .state
                .upgrades
                .iter()
                .filter_map(|u| modes::flavor(mode, u.id).map(|f| (u.level, f)))
                .map(|(level, f)| level as f64 * f.per_second_bonus)
                .sum();
            self.state.per_second = bonus;
        }
    }

    /// Admin: pin a derived stat to an explicit value, frozen against
    /// recomputation until the feeding upgrade's level next changes.
    pub fn admin_set_stat(&mut self, stat: Stat, value: f64) -> Result<Outcome, EngineError> {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidInput(
                "must be a non-negative number".into(),
            ));
        }
        match stat {
            Stat::PerClick => {
                self.state.per_click = value;
                self.state.per_click_overridden = true;
            }
            Stat::PerSecond => {
                self.state.per_second = value;
                self.state.per_second_overridden = true;
            }
        }
        self.commit();
        Ok(Outcome::StatSet { stat, value })
    }

    /// Admin: set an upgrade level directly, bypassing cost.
    pub fn admin_set_level(&mut self, id: UpgradeId, level: f64) -> Result<Outcome, EngineError> {
        if !level.is_finite() || level < 0.0 || level.fract() != 0.0 || level > u32::MAX as f64 {
            return Err(EngineError::InvalidInput(
                "level must be a non-negative whole number".into(),
            ));
        }
        let flavor =
            modes::flavor(self.registry.active(), id).ok_or(EngineError::UnknownUpgrade)?;
        let level = level as u32;
        self.state.set_level(id, level);
        if flavor.per_click_bonus != 0.0 {
            self.state.per_click_overridden = false;
        }
        if flavor.per_second_bonus != 0.0 {
            self.state.per_second_overridden = false;
        }
        self.recompute_derived();
        self.commit();
        Ok(Outcome::LevelSet { id, level })
    }

    /// Admin: set a level through the string-keyed path (console-style entry).
    pub fn admin_set_level_by_key(
        &mut self,
        key: &str,
        level: f64,
    ) -> Result<Outcome, EngineError> {
        let id = UpgradeId::from_key(key.trim()).ok_or(EngineError::UnknownUpgrade)?;
        self.admin_set_level(id, level)
    }

    /// Admin: set the balance. Granted increases count toward lifetime
    /// earnings; confiscations never shrink them retroactively.
    pub fn admin_set_currency(&mut self, value: f64) -> Result<Outcome, EngineError> {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidInput(
                "must be a non-negative number".into(),
            ));
        }
        let gained = (value - self.state.currency).max(0.0);
        self.state.currency = value;
        self.state.total_earned += gained;
        self.commit();
        Ok(Outcome::CurrencySet { value })
    }

    /// Redeem a secret code. Grant codes pay out every time; unlock codes
    /// report "already active" on repeats without touching state.
    pub fn redeem(&mut self, raw: &str) -> Result<Outcome, EngineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let def = codes::lookup(trimmed).ok_or(EngineError::InvalidCode)?;
        match def.effect {
            CodeEffect::GrantCurrency(amount) => {
                self.state.currency += amount;
                self.state.total_earned += amount;
                self.commit();
                Ok(Outcome::CurrencyGranted { amount })
            }
            CodeEffect::UnlockAdmin => {
                if self.state.admin_unlocked {
                    return Ok(Outcome::AdminAlreadyUnlocked);
                }
                self.state.admin_unlocked = true;
                self.commit();
                Ok(Outcome::AdminUnlocked)
            }
            CodeEffect::UnlockMode(mode) => {
                if self.state.unlocked_mode == Some(mode) {
                    return Ok(Outcome::ModeAlreadyUnlocked(mode));
                }
                self.state.unlocked_mode = Some(mode);
                self.commit();
                Ok(Outcome::ModeUnlocked(mode))
            }
        }
    }

    /// Record the last-viewed panel so a reload restores it.
    pub fn set_active_tab(&mut self, tab: Tab) -> Outcome {
        self.state.active_tab = tab;
        self.commit();
        Outcome::TabShown(tab)
    }

    /// Switch skins: save the outgoing profile to its own slot, persist the
    /// selector, load the incoming slot, and re-derive stats under the new
    /// mode's bonus table. Always a save-then-load pair, never a diff.
    pub fn switch_mode(&mut self, to: ModeId) -> Result<Outcome, EngineError> {
        if to == self.registry.active() {
            return Ok(Outcome::ModeUnchanged);
        }
        if !self.registry.can_enter(to, self.state.unlocked_mode) {
            return Err(EngineError::InvalidInput("that mode is locked".into()));
        }
        self.slots.save(self.registry.active(), &self.state);
        self.registry.set_active(to);
        self.slots.save_active_mode(to);
        self.state = self.slots.load(to);
        self.recompute_derived();
        Ok(Outcome::ModeSwitched(to))
    }

    /// Wipe every slot and the selector, then start over in the default
    /// mode. There is no undo.
    pub fn reset_all(&mut self) -> Outcome {
        self.slots.clear_all();
        self.registry.set_active(ModeId::default_mode());
        self.state = GameState::new();
        Outcome::WasReset
    }
}
