//! Coupling device motion to the dice
//!
//! While a round is rolling and the player is shaking, every motion sample is
//! turned into an impulse and a torque and pushed into each die's body.

use glam::Vec3;

use super::body::{Die, RigidBody};
use super::motion::{Acceleration, MotionSignal};
use super::state::GamePhase;
use crate::audio::AudioCues;
use crate::consts::*;
use crate::max_abs_axis;

/// Impulse and torque derived from one acceleration sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiceForce {
    pub impulse: Vec3,
    pub torque: Vec3,
}

impl DiceForce {
    pub fn from_acceleration(accel: Acceleration) -> Self {
        let impulse = Vec3::new(
            accel.x * IMPULSE_SCALE_XZ,
            accel.y.abs() * IMPULSE_SCALE_Y,
            accel.z * IMPULSE_SCALE_XZ,
        );
        let torque = Vec3::new(accel.z, accel.y, accel.x) * TORQUE_SCALE;
        Self { impulse, torque }
    }

    /// Push into a body, impulse through its center
    pub fn apply<B: RigidBody>(&self, body: &mut B) {
        let center = body.world_position();
        body.apply_impulse(self.impulse, center);
        body.apply_torque(self.torque);
    }
}

/// Apply the current sample to every die if the round is rolling and the
/// player is shaking. Returns true if forces were applied.
pub fn route_forces<B: RigidBody, A: AudioCues + ?Sized>(
    phase: GamePhase,
    signal: &MotionSignal,
    dice: &mut [Die<B>],
    audio: &A,
    hit_threshold: f32,
) -> bool {
    if phase != GamePhase::Rolling || !signal.is_shaking() {
        return false;
    }

    let accel = signal.acceleration();
    let force = DiceForce::from_acceleration(accel);
    for die in dice.iter_mut() {
        force.apply(&mut die.body);
    }

    if max_abs_axis(accel.as_vec3()) > hit_threshold {
        audio.play_hit();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::sim::arena::DampedBody;
    use crate::sim::motion::MotionPermission;
    use glam::Quat;

    fn shaking_signal(sample: Acceleration) -> MotionSignal {
        let mut signal = MotionSignal::default();
        signal.set_permission(MotionPermission::Granted);
        let loud = Acceleration::new(12.0, 0.0, 0.0);
        for i in 0..3 {
            signal.ingest(loud, i as f64 * 400.0);
        }
        // Latest sample below threshold still drives the forces
        signal.ingest(sample, 1000.0);
        assert!(signal.is_shaking());
        signal
    }

    fn dice() -> Vec<Die<DampedBody>> {
        (0..2)
            .map(|i| Die::new(i, DampedBody::new(Vec3::new(i as f32, 1.0, 0.0), Quat::IDENTITY)))
            .collect()
    }

    #[test]
    fn test_force_scaling() {
        let f = DiceForce::from_acceleration(Acceleration::new(2.0, -4.0, 6.0));
        assert_eq!(f.impulse, Vec3::new(1.0, 1.2, 3.0));
        let expected_torque = Vec3::new(0.6, -0.4, 0.2);
        assert!((f.torque - expected_torque).length() < 1e-6);
    }

    #[test]
    fn test_routes_only_while_rolling_and_shaking() {
        let audio = RecordingAudio::default();
        let sample = Acceleration::new(2.0, 3.0, 1.0);
        let signal = shaking_signal(sample);
        let mut dice = dice();

        assert!(!route_forces(GamePhase::Betting, &signal, &mut dice, &audio, HIT_CUE_THRESHOLD));
        assert!(!route_forces(GamePhase::Result, &signal, &mut dice, &audio, HIT_CUE_THRESHOLD));
        assert!(dice.iter().all(|d| d.body.velocity() == Vec3::ZERO));

        assert!(route_forces(GamePhase::Rolling, &signal, &mut dice, &audio, HIT_CUE_THRESHOLD));
        for die in &dice {
            assert!((die.body.velocity() - Vec3::new(1.0, 0.9, 0.5)).length() < 1e-6);
            // Impulse goes through the center: no spin until torque integrates
            assert_eq!(die.body.angular_velocity(), Vec3::ZERO);
        }
        assert_eq!(audio.hits(), 0);
    }

    #[test]
    fn test_not_shaking_applies_nothing() {
        let audio = RecordingAudio::default();
        let signal = MotionSignal::default();
        let mut dice = dice();
        assert!(!route_forces(GamePhase::Rolling, &signal, &mut dice, &audio, HIT_CUE_THRESHOLD));
        assert!(dice.iter().all(|d| d.body.velocity() == Vec3::ZERO));
    }

    #[test]
    fn test_hard_axis_plays_hit() {
        let audio = RecordingAudio::default();
        let signal = shaking_signal(Acceleration::new(0.0, -5.5, 0.0));
        let mut dice = dice();
        route_forces(GamePhase::Rolling, &signal, &mut dice, &audio, HIT_CUE_THRESHOLD);
        assert_eq!(audio.hits(), 1);
    }
}
