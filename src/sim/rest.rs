//! Rest detection
//!
//! A stateless poll: every die's linear and angular speed against one shared
//! threshold, gated on the shake signal having dropped.

use super::body::{Die, RigidBody};
use crate::consts::REST_THRESHOLD;

/// True when both speeds are at or below `threshold`
#[inline]
pub fn is_at_rest<B: RigidBody>(body: &B, threshold: f32) -> bool {
    body.velocity().length() <= threshold && body.angular_velocity().length() <= threshold
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestDetector {
    pub threshold: f32,
}

impl Default for RestDetector {
    fn default() -> Self {
        Self {
            threshold: REST_THRESHOLD,
        }
    }
}

impl RestDetector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// All dice resting at this instant, and nobody shaking
    pub fn settled<B: RigidBody>(&self, dice: &[Die<B>], is_shaking: bool) -> bool {
        !is_shaking && dice.iter().all(|die| is_at_rest(&die.body, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::DampedBody;
    use glam::{Quat, Vec3};

    fn die(velocity: Vec3, angular: Vec3) -> Die<DampedBody> {
        let mut body = DampedBody::new(Vec3::ZERO, Quat::IDENTITY);
        body.velocity = velocity;
        body.angular_velocity = angular;
        Die::new(0, body)
    }

    #[test]
    fn test_threshold_boundary() {
        let d = die(Vec3::new(0.09, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.095));
        assert!(is_at_rest(&d.body, REST_THRESHOLD));
        let d = die(Vec3::new(0.0, 0.11, 0.0), Vec3::ZERO);
        assert!(!is_at_rest(&d.body, REST_THRESHOLD));
    }

    #[test]
    fn test_spinning_in_place_is_not_rest() {
        let d = die(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        assert!(!is_at_rest(&d.body, REST_THRESHOLD));
    }

    #[test]
    fn test_every_die_must_rest() {
        let detector = RestDetector::default();
        let dice = [die(Vec3::ZERO, Vec3::ZERO), die(Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO)];
        assert!(!detector.settled(&dice, false));
        let dice = [die(Vec3::ZERO, Vec3::ZERO), die(Vec3::new(0.05, 0.0, 0.0), Vec3::ZERO)];
        assert!(detector.settled(&dice, false));
    }

    #[test]
    fn test_never_settled_while_shaking() {
        let detector = RestDetector::default();
        let dice = [die(Vec3::ZERO, Vec3::ZERO), die(Vec3::ZERO, Vec3::ZERO)];
        assert!(!detector.settled(&dice, true));
    }

    #[test]
    fn test_poll_is_idempotent() {
        let detector = RestDetector::new(0.05);
        let dice = [die(Vec3::new(0.07, 0.0, 0.0), Vec3::ZERO)];
        assert_eq!(detector.settled(&dice, false), detector.settled(&dice, false));
        assert!(!detector.settled(&dice, false));
    }
}
