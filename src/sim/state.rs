//! Game state and core round types

use glam::{EulerRot, Quat};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::betting::{BettingEngine, RoundScore};
use super::body::{Die, RigidBody};
use super::forces::route_forces;
use super::motion::{Acceleration, MotionSignal};
use crate::audio::AudioCues;
use crate::consts::DICE_COUNT;
use crate::persistence::KeyValueStore;
use crate::settings::Tuning;
use crate::spawn_position;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Choosing a bet
    #[default]
    Betting,
    /// Bet placed, player shaking, dice tumbling
    Rolling,
    /// Dice read and settled, waiting for the player to continue
    Result,
}

/// Phase transitions reported by [`tick`](super::tick::tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BetPlaced { amount: u64 },
    Settled(RoundScore),
    NewRound,
}

/// Everything a running table needs: betting engine, motion signal and dice
pub struct GameState<B: RigidBody, S: KeyValueStore> {
    pub engine: BettingEngine<S>,
    pub motion: MotionSignal,
    pub dice: [Die<B>; DICE_COUNT],
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Cosmetic only: scrambles die orientation between rounds
    rng: Pcg32,
}

impl<B: RigidBody, S: KeyValueStore> GameState<B, S> {
    pub fn new(bodies: [B; DICE_COUNT], store: S, tuning: Tuning, seed: u64) -> Self {
        let mut id = 0;
        let dice = bodies.map(|body| {
            id += 1;
            Die::new(id, body)
        });
        let mut state = Self {
            engine: BettingEngine::new(store),
            motion: MotionSignal::new(tuning.shake_config()),
            dice,
            tuning,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.scramble_dice();
        state
    }

    pub fn phase(&self) -> GamePhase {
        self.engine.phase()
    }

    /// Swap tuning values (e.g. after the settings screen)
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.motion.set_config(tuning.shake_config());
        self.tuning = tuning;
    }

    /// Drop every die back at its spawn point with a random orientation and
    /// no motion
    pub fn scramble_dice(&mut self) {
        use std::f32::consts::PI;

        for (i, die) in self.dice.iter_mut().enumerate() {
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                self.rng.random_range(0.0..PI),
                self.rng.random_range(0.0..PI),
                self.rng.random_range(0.0..PI),
            );
            die.body.reset(spawn_position(i), rotation);
        }
    }

    /// Handle one motion sample. Returns true if it pushed the dice.
    pub fn on_motion<A: AudioCues + ?Sized>(
        &mut self,
        sample: Acceleration,
        now_ms: f64,
        audio: &A,
    ) -> bool {
        self.motion.ingest(sample, now_ms);
        route_forces(
            self.engine.phase(),
            &self.motion,
            &mut self.dice,
            audio,
            self.tuning.hit_cue_threshold,
        )
    }
}
