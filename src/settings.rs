//! Game settings and preferences
//!
//! Loaded once at startup by the driver; serialized as JSON.

use serde::{Deserialize, Serialize};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Scroll speed before viewport scaling and level-ups
    pub fn base_scroll_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Normal => 3.5,
            Difficulty::Hard => 5.0,
        }
    }

    /// Hazard spawn cadence (base ticks, floor ticks)
    pub fn spawn_cadence(&self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (100, 35),
            Difficulty::Normal => (70, 20),
            Difficulty::Hard => (45, 12),
        }
    }

    /// Minimum calm ticks between rapid currents
    pub fn rapid_current_interval(&self) -> u32 {
        match self {
            Difficulty::Hard => 800,
            _ => 1200,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty used when a run starts without an explicit choice
    pub difficulty: Difficulty,

    // === Viewport ===
    pub width: f32,
    pub height: f32,

    /// Seed for the simulation RNG
    pub seed: u64,

    /// Ignore all damage (runs are flagged when it was ever on)
    pub invincible_mode: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            width: 1000.0,
            height: 600.0,

            seed: 0x0EB1_DA54,

            invincible_mode: false,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            bgm_volume: 0.7,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings for a difficulty (other fields default)
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Effective sound-effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music gain (0 when muted)
    pub fn effective_bgm_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.bgm_volume).clamp(0.0, 1.0)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn load(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings ({})", settings.difficulty.as_str());
                settings
            }
            Some(Err(e)) => {
                log::warn!("Settings unreadable ({e}), using defaults");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
