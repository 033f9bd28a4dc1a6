//! Shake Dice - a motion-controlled dice betting mini-game
//!
//! Core modules:
//! - `sim`: Gameplay core (shake detection, force routing, rest detection,
//!   face reading, betting state machine)
//! - `ledger`: Point balance and bet history
//! - `persistence`: Key-value storage port (LocalStorage on web)
//! - `settings`: Player preferences and gameplay tuning
//! - `audio`: Fire-and-forget sound cues

pub mod audio;
pub mod ledger;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use ledger::{BettingLedger, HistoryItem};
pub use settings::{Settings, Tuning};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz, matches typical motion sample rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Dice on the table (fixed for a session)
    pub const DICE_COUNT: usize = 2;

    /// Shake detection defaults
    pub const SHAKE_THRESHOLD: f32 = 8.0;
    pub const SHAKE_COOLDOWN_MS: f64 = 300.0;
    pub const SHAKE_TRIGGER_COUNT: u32 = 3;
    /// Quiet time after the last qualifying sample before shaking is considered over
    pub const SHAKE_RELEASE_MS: f64 = 1000.0;

    /// Linear and angular speed below which a die counts as resting
    pub const REST_THRESHOLD: f32 = 0.1;

    /// Motion-to-force coupling
    pub const IMPULSE_SCALE_XZ: f32 = 0.5;
    pub const IMPULSE_SCALE_Y: f32 = 0.3;
    pub const TORQUE_SCALE: f32 = 0.1;
    /// Any acceleration axis above this fires the hit sound while forces apply
    pub const HIT_CUE_THRESHOLD: f32 = 5.0;

    /// Arena geometry (world units, y up)
    pub const GRAVITY: f32 = -9.81;
    pub const FLOOR_Y: f32 = -0.5;
    pub const ARENA_SIZE: f32 = 8.0;
    pub const WALL_HEIGHT: f32 = 4.0;
    pub const DIE_SIZE: f32 = 1.0;
    pub const DIE_MASS: f32 = 1.0;
    pub const FLOOR_RESTITUTION: f32 = 0.3;
    pub const WALL_RESTITUTION: f32 = 0.4;
}

/// Drop position for die `index` at the start of a betting phase
#[inline]
pub fn spawn_position(index: usize) -> Vec3 {
    let i = index as f32;
    Vec3::new(i - 0.5, 3.0 + i * 0.5, 0.0)
}

/// Largest absolute component of a vector
#[inline]
pub fn max_abs_axis(v: Vec3) -> f32 {
    v.abs().max_element()
}
