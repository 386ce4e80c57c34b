//! Canonical game state and upgrade definitions.

use super::modes::ModeId;

/// Stable upgrade identifiers, independent of the per-mode display names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeId {
    StrongerClicks,
    AutoClicker,
    ClickServo,
    ClickFarm,
}

impl UpgradeId {
    /// All upgrades in shop display order.
    pub fn all() -> &'static [UpgradeId] {
        &[
            UpgradeId::StrongerClicks,
            UpgradeId::AutoClicker,
            UpgradeId::ClickServo,
            UpgradeId::ClickFarm,
        ]
    }

    /// Stable slug used as the save-payload key.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::StrongerClicks => "stronger_clicks",
            UpgradeId::AutoClicker => "auto_clicker",
            UpgradeId::ClickServo => "click_servo",
            UpgradeId::ClickFarm => "click_farm",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        UpgradeId::all().iter().copied().find(|u| u.key() == key)
    }

    /// Cost of the first level. Immutable per upgrade, shared by all modes.
    pub fn base_cost(&self) -> f64 {
        match self {
            UpgradeId::StrongerClicks => 10.0,
            UpgradeId::AutoClicker => 25.0,
            UpgradeId::ClickServo => 200.0,
            UpgradeId::ClickFarm => 500.0,
        }
    }

    /// Per-level cost growth factor. Immutable, > 1.
    pub fn cost_multiplier(&self) -> f64 {
        match self {
            UpgradeId::StrongerClicks => 1.5,
            UpgradeId::AutoClicker => 1.6,
            UpgradeId::ClickServo => 1.8,
            UpgradeId::ClickFarm => 1.7,
        }
    }
}

/// Owned level of one upgrade. Levels only move up by purchase (+1) or by an
/// explicit admin set.
#[derive(Clone, Debug)]
pub struct OwnedUpgrade {
    pub id: UpgradeId,
    pub level: u32,
}

/// UI panels. The last-viewed one is persisted so a reload restores context;
/// it has no gameplay effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Clicker,
    Shop,
    Stats,
    Codes,
    Admin,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Clicker, Tab::Shop, Tab::Stats, Tab::Codes, Tab::Admin]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Tab::Clicker => "clicker",
            Tab::Shop => "shop",
            Tab::Stats => "stats",
            Tab::Codes => "codes",
            Tab::Admin => "admin",
        }
    }

    pub fn from_key(key: &str) -> Option<Tab> {
        Tab::all().iter().copied().find(|t| t.key() == key)
    }
}

/// Full state of one profile (one per mode, persisted independently).
///
/// `per_click` and `per_second` are derived from upgrade levels unless the
/// matching override flag is set, in which case they are frozen at the value
/// the admin panel stored until the feeding upgrade's level next changes.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Spendable balance. Never negative.
    pub currency: f64,
    /// Lifetime earnings, for the stats panel. Spending and admin
    /// confiscation never reduce it.
    pub total_earned: f64,
    pub per_click: f64,
    pub per_second: f64,
    pub per_click_overridden: bool,
    pub per_second_overridden: bool,
    /// Levels in `UpgradeId::all()` order.
    pub upgrades: Vec<OwnedUpgrade>,
    pub active_tab: Tab,
    /// Sticky once earned; only a full reset clears it.
    pub admin_unlocked: bool,
    /// Alternate skin this profile has discovered via secret code.
    pub unlocked_mode: Option<ModeId>,
}

impl GameState {
    /// The default template: what a fresh profile (or a reset) starts from,
    /// and what missing save fields are backfilled with.
    pub fn new() -> Self {
        Self {
            currency: 0.0,
            total_earned: 0.0,
            per_click: 1.0,
            per_second: 0.0,
            per_click_overridden: false,
            per_second_overridden: false,
            upgrades: UpgradeId::all()
                .iter()
                .map(|&id| OwnedUpgrade { id, level: 0 })
                .collect(),
            active_tab: Tab::Clicker,
            admin_unlocked: false,
            unlocked_mode: None,
        }
    }

    pub fn level_of(&self, id: UpgradeId) -> u32 {
        self.upgrades
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.level)
            .unwrap_or(0)
    }

    pub fn set_level(&mut self, id: UpgradeId, level: u32) {
        if let Some(u) = self.upgrades.iter_mut().find(|u| u.id == id) {
            u.level = level;
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
