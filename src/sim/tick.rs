//! Per-frame round loop
//!
//! Runs once per rendered frame after the physics engine has stepped. Motion
//! samples are handled separately by [`GameState::on_motion`] as they arrive.

use super::betting::RoundScore;
use super::body::RigidBody;
use super::faces::read_dice;
use super::state::{GameEvent, GamePhase, GameState};
use crate::audio::AudioCues;
use crate::persistence::KeyValueStore;

/// Player commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall clock (ms), used to time out an idle shake
    pub now_ms: f64,
    /// Place the selected bet (Betting only)
    pub place_bet: bool,
    /// Continue to the next round (Result only)
    pub reset: bool,
}

/// Advance the round state machine by one frame
pub fn tick<B, S, A>(state: &mut GameState<B, S>, input: &TickInput, audio: &A) -> Option<GameEvent>
where
    B: RigidBody,
    S: KeyValueStore,
    A: AudioCues + ?Sized,
{
    state.time_ticks += 1;
    state.motion.update(input.now_ms);

    match state.engine.phase() {
        GamePhase::Betting => {
            if input.place_bet && state.engine.place_bet() {
                // Shakes from before the bet don't count toward this roll
                state.motion.reset_shake();
                return Some(GameEvent::BetPlaced {
                    amount: state.engine.wager(),
                });
            }
        }
        GamePhase::Rolling => {
            // Only read the dice once the player has shaken and stopped
            if !state.motion.shake_completed() {
                return None;
            }
            let detector = state.tuning.rest_detector();
            if !detector.settled(&state.dice, state.motion.is_shaking()) {
                return None;
            }
            let values = read_dice(&state.dice);
            let score = state.engine.handle_dice_result(values)?;
            announce(&score, audio);
            state.motion.reset_shake();
            return Some(GameEvent::Settled(score));
        }
        GamePhase::Result => {
            if input.reset && state.engine.reset() {
                state.scramble_dice();
                log::info!("New round ({} points)", state.engine.total_points());
                return Some(GameEvent::NewRound);
            }
        }
    }

    None
}

fn announce<A: AudioCues + ?Sized>(score: &RoundScore, audio: &A) {
    if score.is_win() {
        audio.play_success();
    }
}
