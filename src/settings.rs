//! Player preferences and gameplay tuning
//!
//! Persisted separately from the ledger under its own key.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};
use crate::sim::motion::ShakeConfig;
use crate::sim::rest::RestDetector;

/// Gameplay thresholds. Defaults match the shipped feel of the game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Acceleration magnitude a sample must exceed to count as a shake
    pub shake_threshold: f32,
    /// Minimum spacing between counted shake samples (ms)
    pub shake_cooldown_ms: f64,
    /// Counted samples before shaking latches
    pub shake_trigger_count: u32,
    /// Quiet time that ends a shake (ms)
    pub shake_release_ms: f64,
    /// Linear/angular speed below which a die is resting
    pub rest_threshold: f32,
    /// Axis magnitude that fires the hit sound while pushing dice
    pub hit_cue_threshold: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shake_threshold: SHAKE_THRESHOLD,
            shake_cooldown_ms: SHAKE_COOLDOWN_MS,
            shake_trigger_count: SHAKE_TRIGGER_COUNT,
            shake_release_ms: SHAKE_RELEASE_MS,
            rest_threshold: REST_THRESHOLD,
            hit_cue_threshold: HIT_CUE_THRESHOLD,
        }
    }
}

impl Tuning {
    pub fn shake_config(&self) -> ShakeConfig {
        ShakeConfig {
            threshold: self.shake_threshold,
            cooldown_ms: self.shake_cooldown_ms,
            trigger_count: self.shake_trigger_count.max(1),
            release_ms: self.shake_release_ms,
        }
    }

    pub fn rest_detector(&self) -> RestDetector {
        RestDetector::new(self.rest_threshold)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Gameplay ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "shake_dice_settings";

    /// Effective sound effect volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Load settings, falling back to defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match load_json::<Self, S>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
