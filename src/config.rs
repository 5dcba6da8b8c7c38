//! Application settings loaded from `appsettings.json`
//!
//! Every field is optional; a missing file means defaults. Keys are
//! PascalCase:
//!
//! ```json
//! {
//!   "Hotkey": { "Modifiers": { "Control": true, "Alt": true }, "Key": "F" },
//!   "Session": { "DisplayTimeMs": 10000, "TickIntervalMs": 16 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use sdl2::keyboard::{Keycode, Mod};
use serde::{Deserialize, Serialize};

use crate::error::{DeskburstError, Result};
use crate::fireworks::{DEFAULT_DISPLAY_TIME, TICK_INTERVAL};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AppConfig {
    pub hotkey: HotkeyConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load settings from a JSON file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|source| DeskburstError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Key combination that toggles a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HotkeyConfig {
    pub modifiers: ModifierConfig,
    /// SDL key name, e.g. "F" or "F12"
    pub key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            modifiers: ModifierConfig::default(),
            key: "F".to_string(),
        }
    }
}

impl HotkeyConfig {
    /// Human-readable form, e.g. "Ctrl+Alt+F"
    pub fn description(&self) -> String {
        let m = &self.modifiers;
        let mut parts = Vec::new();
        if m.control {
            parts.push("Ctrl");
        }
        if m.alt {
            parts.push("Alt");
        }
        if m.shift {
            parts.push("Shift");
        }
        if m.windows {
            parts.push("Win");
        }
        parts.push(self.key.as_str());
        parts.join("+")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ModifierConfig {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub windows: bool,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            control: true,
            alt: true,
            shift: false,
            windows: false,
        }
    }
}

impl ModifierConfig {
    /// Exact match against SDL's modifier state; lock keys are ignored
    pub fn matches(&self, keymod: Mod) -> bool {
        let held = |mask: Mod| keymod.intersects(mask);
        held(Mod::LCTRLMOD | Mod::RCTRLMOD) == self.control
            && held(Mod::LALTMOD | Mod::RALTMOD) == self.alt
            && held(Mod::LSHIFTMOD | Mod::RSHIFTMOD) == self.shift
            && held(Mod::LGUIMOD | Mod::RGUIMOD) == self.windows
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SessionConfig {
    pub display_time_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            display_time_ms: DEFAULT_DISPLAY_TIME.as_millis() as u64,
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl SessionConfig {
    pub fn display_time(&self) -> Duration {
        Duration::from_millis(self.display_time_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// A hotkey resolved to SDL key codes
#[derive(Debug, Clone)]
pub struct Hotkey {
    pub(crate) key: Keycode,
    pub(crate) modifiers: ModifierConfig,
    description: String,
}

impl Hotkey {
    pub fn from_config(config: &HotkeyConfig) -> Result<Self> {
        let key = Keycode::from_name(&config.key)
            .ok_or_else(|| DeskburstError::UnknownKey(config.key.clone()))?;
        Ok(Self {
            key,
            modifiers: config.modifiers,
            description: config.description(),
        })
    }

    pub fn matches(&self, key: Keycode, keymod: Mod) -> bool {
        key == self.key && self.modifiers.matches(keymod)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
