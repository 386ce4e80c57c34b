//! Click Lab, an incremental clicker with swappable skins.
//!
//! The engine owns all game rules; this module is the intent layer between
//! raw browser input and engine operations, plus the per-frame UI state
//! (message line, text-entry focus) that is not part of the saved profile.

pub mod codes;
pub mod cost;
pub mod engine;
pub mod modes;
pub mod render;
pub mod save;
pub mod state;

use engine::{Engine, EngineError, Outcome, Stat};
use modes::ModeId;
use save::KvStore;
use state::{Tab, UpgradeId};

/// Fields the admin panel can edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminField {
    Currency,
    PerClick,
    PerSecond,
    Level(UpgradeId),
}

/// Everything a tap or key press can ask of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    PressButton,
    Buy(UpgradeId),
    ShowTab(Tab),
    SwitchMode(ModeId),
    EditAdminField(AdminField),
    SubmitEntry,
    ResetAll,
}

/// Keyboard input, normalized from the backend's key events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Backspace,
    Esc,
}

/// Where typed characters currently go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryMode {
    /// Keys are game shortcuts.
    None,
    /// The buffer collects a redeem code (Codes tab).
    Code,
    /// The buffer collects a number for one admin field.
    AdminValue(AdminField),
}

/// Presentation-only state. Lives and dies with the page; never persisted.
pub struct UiState {
    pub message: Option<String>,
    pub entry: EntryMode,
    pub buffer: String,
}

impl UiState {
    fn new() -> Self {
        Self {
            message: None,
            entry: EntryMode::None,
            buffer: String::new(),
        }
    }
}

pub struct App<S: KvStore> {
    pub engine: Engine<S>,
    pub ui: UiState,
}

impl<S: KvStore> App<S> {
    pub fn new(store: S) -> Self {
        let mut app = Self {
            engine: Engine::new(store),
            ui: UiState::new(),
        };
        // A reload onto the Codes tab starts with the entry focused, same
        // as navigating there.
        if app.engine.state().active_tab == Tab::Codes {
            app.ui.entry = EntryMode::Code;
        }
        app
    }

    /// Route a key press. Returns true if it was consumed.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        match self.ui.entry {
            EntryMode::None => self.handle_shortcut(key),
            EntryMode::Code | EntryMode::AdminValue(_) => self.handle_entry_key(key),
        }
    }

    fn handle_shortcut(&mut self, key: KeyInput) -> bool {
        let KeyInput::Char(c) = key else {
            return false;
        };
        match c.to_ascii_lowercase() {
            'c' | ' ' => self.apply(Intent::PressButton),
            '1'..='4' => {
                let idx = c as usize - '1' as usize;
                match UpgradeId::all().get(idx) {
                    Some(&id) => self.apply(Intent::Buy(id)),
                    None => return false,
                }
            }
            'g' => self.apply(Intent::ShowTab(Tab::Clicker)),
            's' => self.apply(Intent::ShowTab(Tab::Shop)),
            't' => self.apply(Intent::ShowTab(Tab::Stats)),
            'o' => self.apply(Intent::ShowTab(Tab::Codes)),
            'a' => self.apply(Intent::ShowTab(Tab::Admin)),
            'm' => {
                let next = self.next_mode();
                self.apply(Intent::SwitchMode(next))
            }
            'r' if self.engine.state().active_tab == Tab::Admin => self.apply(Intent::ResetAll),
            _ => return false,
        }
        true
    }

    fn handle_entry_key(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let accept = match self.ui.entry {
                    EntryMode::Code => c.is_ascii_alphanumeric(),
                    EntryMode::AdminValue(_) => c.is_ascii_digit() || c == '.',
                    EntryMode::None => false,
                };
                if accept && self.ui.buffer.len() < 32 {
                    self.ui.buffer.push(c);
                }
                true
            }
            KeyInput::Backspace => {
                self.ui.buffer.pop();
                true
            }
            KeyInput::Enter => {
                self.apply(Intent::SubmitEntry);
                true
            }
            KeyInput::Esc => {
                self.ui.buffer.clear();
                self.ui.entry = EntryMode::None;
                true
            }
        }
    }

    /// The mode the `m` shortcut (and the switch row) toggles to.
    pub fn next_mode(&self) -> ModeId {
        if self.engine.mode() == ModeId::default_mode() {
            self.engine
                .state()
                .unlocked_mode
                .unwrap_or_else(ModeId::default_mode)
        } else {
            ModeId::default_mode()
        }
    }

    /// Apply one intent, folding the result into the UI message line.
    pub fn apply(&mut self, intent: Intent) {
        let result = match intent {
            Intent::PressButton => Ok(self.engine.click()),
            Intent::Buy(id) => self.engine.buy(id),
            Intent::ShowTab(tab) => {
                if tab == Tab::Admin && !self.engine.state().admin_unlocked {
                    Err(EngineError::InvalidInput("the admin panel is locked".into()))
                } else {
                    self.ui.buffer.clear();
                    self.ui.entry = if tab == Tab::Codes {
                        EntryMode::Code
                    } else {
                        EntryMode::None
                    };
                    Ok(self.engine.set_active_tab(tab))
                }
            }
            Intent::SwitchMode(mode) => self.engine.switch_mode(mode),
            Intent::EditAdminField(field) => {
                self.ui.buffer.clear();
                self.ui.entry = EntryMode::AdminValue(field);
                self.ui.message = None;
                return;
            }
            Intent::SubmitEntry => self.submit_entry(),
            Intent::ResetAll => Ok(self.engine.reset_all()),
        };
        self.ui.message = match result {
            Ok(outcome) => {
                let text = self.describe(&outcome);
                (!text.is_empty()).then_some(text)
            }
            Err(e) => Some(e.to_string()),
        };
    }

    fn submit_entry(&mut self) -> Result<Outcome, EngineError> {
        match self.ui.entry {
            EntryMode::Code => {
                let code = std::mem::take(&mut self.ui.buffer);
                self.engine.redeem(&code)
            }
            EntryMode::AdminValue(field) => {
                let raw = std::mem::take(&mut self.ui.buffer);
                let value: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| EngineError::InvalidInput("not a number".into()))?;
                let outcome = match field {
                    AdminField::Currency => self.engine.admin_set_currency(value)?,
                    AdminField::PerClick => self.engine.admin_set_stat(Stat::PerClick, value)?,
                    AdminField::PerSecond => self.engine.admin_set_stat(Stat::PerSecond, value)?,
                    AdminField::Level(id) => self.engine.admin_set_level(id, value)?,
                };
                self.ui.entry = EntryMode::None;
                Ok(outcome)
            }
            EntryMode::None => Err(EngineError::EmptyInput),
        }
    }

    /// Human-readable message for the outcome line. Upgrade and currency
    /// names come from the active mode's flavor table.
    fn describe(&self, outcome: &Outcome) -> String {
        let mode = self.engine.mode();
        let currency = modes::spec(mode).currency_name;
        let upgrade_name = |id: UpgradeId| {
            modes::flavor(mode, id)
                .map(|f| f.name)
                .unwrap_or_else(|| id.key())
        };
        match outcome {
            Outcome::Clicked { gained } => format!("+{gained} {currency}"),
            Outcome::TickApplied { gained } => format!("+{gained} {currency} (passive)"),
            Outcome::Purchased { id, cost, level } => {
                format!("{} is now level {level} (-{cost} {currency})", upgrade_name(*id))
            }
            Outcome::StatSet { stat, value } => match stat {
                Stat::PerClick => format!("per-press rate pinned to {value}"),
                Stat::PerSecond => format!("per-second rate pinned to {value}"),
            },
            Outcome::LevelSet { id, level } => {
                format!("{} level set to {level}", upgrade_name(*id))
            }
            Outcome::CurrencySet { value } => format!("balance set to {value}"),
            Outcome::CurrencyGranted { amount } => format!("code accepted: +{amount} {currency}"),
            Outcome::AdminUnlocked => "admin panel unlocked".into(),
            Outcome::AdminAlreadyUnlocked => "admin panel is already unlocked".into(),
            Outcome::ModeUnlocked(m) => {
                format!("{} discovered! Press M to switch", modes::spec(*m).title)
            }
            Outcome::ModeAlreadyUnlocked(m) => {
                format!("{} is already unlocked", modes::spec(*m).title)
            }
            Outcome::ModeSwitched(m) => format!("welcome to {}", modes::spec(*m).title),
            Outcome::ModeUnchanged => "already there".into(),
            Outcome::TabShown(_) => String::new(), // tab switches are silent
            Outcome::WasReset => "all progress wiped".into(),
        }
    }
}
