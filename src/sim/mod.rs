//! Gameplay core
//!
//! Everything that decides a round lives here. Physics integration, audio and
//! storage are reached only through the `RigidBody`, `AudioCues` and
//! `KeyValueStore` seams:
//! - Motion samples only mutate `MotionSignal`
//! - Rest and face reads see every die at the same tick
//! - No rendering or platform dependencies

pub mod arena;
pub mod betting;
pub mod body;
pub mod faces;
pub mod forces;
pub mod motion;
pub mod rest;
pub mod state;
pub mod tick;

pub use arena::DampedBody;
pub use betting::{BettingEngine, Outcome, PRESET_BETS, RoundScore, WinRule, evaluate_roll};
pub use body::{Die, FACE_NORMALS, RigidBody};
pub use faces::{read_dice, resolve_face};
pub use forces::{DiceForce, route_forces};
pub use motion::{Acceleration, MotionPermission, MotionSignal, ShakeConfig, ShakeState};
pub use rest::{RestDetector, is_at_rest};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
