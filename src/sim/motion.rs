//! Shake detection from raw accelerometer samples
//!
//! Samples arrive asynchronously at whatever rate the device reports. Each one
//! updates the latest acceleration; samples whose magnitude clears the
//! threshold, spaced at least a cooldown apart, bump a counter. Enough of
//! them latches `is_shaking`. Once shaking, a quiet period with no qualifying
//! sample releases it, and the signal stays released until `reset_shake`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Device-frame acceleration including gravity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from platform readings where any axis may be missing (defaults to 0)
    pub fn from_axes(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        let axis = |v: Option<f64>| v.filter(|v| v.is_finite()).unwrap_or(0.0) as f32;
        Self::new(axis(x), axis(y), axis(z))
    }

    /// Euclidean norm
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.as_vec3().length()
    }

    #[inline]
    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Motion sensor access, as granted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionPermission {
    /// Not asked yet
    #[default]
    Unknown,
    Granted,
    /// Denied or unsupported; the player may retry
    Denied,
}

/// Shake detector parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeConfig {
    /// Magnitude a sample must exceed to count
    pub threshold: f32,
    /// Minimum spacing between counted samples (ms)
    pub cooldown_ms: f64,
    /// Counted samples needed before shaking latches
    pub trigger_count: u32,
    /// Quiet time that ends an active shake (ms)
    pub release_ms: f64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            threshold: SHAKE_THRESHOLD,
            cooldown_ms: SHAKE_COOLDOWN_MS,
            trigger_count: SHAKE_TRIGGER_COUNT,
            release_ms: SHAKE_RELEASE_MS,
        }
    }
}

/// Debounced shake counter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShakeState {
    pub is_shaking: bool,
    pub shake_count: u32,
    /// Timestamp (ms) of the last counted sample
    pub last_shake_ms: Option<f64>,
    /// Set when a shake has ended this round; blocks re-triggering until reset
    pub released: bool,
}

/// Accelerometer-driven shake signal
#[derive(Debug, Clone)]
pub struct MotionSignal {
    config: ShakeConfig,
    permission: MotionPermission,
    /// False when the platform has no motion API at all
    available: bool,
    latest: Acceleration,
    state: ShakeState,
}

impl Default for MotionSignal {
    fn default() -> Self {
        Self::new(ShakeConfig::default())
    }
}

impl MotionSignal {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            permission: MotionPermission::Unknown,
            available: true,
            latest: Acceleration::ZERO,
            state: ShakeState::default(),
        }
    }

    /// A signal for devices without a motion API: never shakes, never errors
    pub fn unavailable() -> Self {
        Self {
            available: false,
            permission: MotionPermission::Denied,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ShakeConfig) {
        self.config = config;
    }

    pub fn permission(&self) -> MotionPermission {
        self.permission
    }

    /// Record the platform's answer to a permission request
    pub fn set_permission(&mut self, permission: MotionPermission) {
        if !self.available {
            return;
        }
        if permission != self.permission {
            log::info!("Motion permission: {:?}", permission);
        }
        self.permission = permission;
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Latest raw sample (updated on every accepted sample)
    pub fn acceleration(&self) -> Acceleration {
        self.latest
    }

    pub fn is_shaking(&self) -> bool {
        self.state.is_shaking
    }

    /// A shake started and has since ended this round
    pub fn shake_completed(&self) -> bool {
        self.state.released && !self.state.is_shaking
    }

    pub fn state(&self) -> &ShakeState {
        &self.state
    }

    /// Feed one sample. Returns true if this sample started a shake.
    pub fn ingest(&mut self, sample: Acceleration, now_ms: f64) -> bool {
        if !self.available || self.permission != MotionPermission::Granted {
            return false;
        }

        self.latest = sample;

        if sample.magnitude() <= self.config.threshold {
            return false;
        }

        let cooled_down = self
            .state
            .last_shake_ms
            .is_none_or(|last| now_ms - last >= self.config.cooldown_ms);
        if !cooled_down {
            return false;
        }

        self.state.last_shake_ms = Some(now_ms);
        self.state.shake_count = self.state.shake_count.saturating_add(1);

        if self.state.shake_count >= self.config.trigger_count
            && !self.state.is_shaking
            && !self.state.released
        {
            self.state.is_shaking = true;
            log::info!("Shake detected ({} counted samples)", self.state.shake_count);
            return true;
        }
        false
    }

    /// Advance the clock without a sample. Returns true if this ended a shake.
    pub fn update(&mut self, now_ms: f64) -> bool {
        if !self.state.is_shaking {
            return false;
        }
        let quiet = self
            .state
            .last_shake_ms
            .is_none_or(|last| now_ms - last >= self.config.release_ms);
        if quiet {
            self.state.is_shaking = false;
            self.state.released = true;
            log::info!("Shake ended, dice settling");
            return true;
        }
        false
    }

    /// Re-arm for the next round
    pub fn reset_shake(&mut self) {
        self.state = ShakeState::default();
    }
}
