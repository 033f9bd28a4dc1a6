//! Dice and the physics seam they sit on
//!
//! The gameplay core never integrates physics itself. Each die wraps a body
//! handle from whatever engine runs the world and only talks to it through
//! [`RigidBody`].

use glam::{Quat, Vec3};

/// Per-body capability exposed by the physics engine
pub trait RigidBody {
    /// Instantaneous change in momentum applied at a world-space point
    fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3);
    /// Torque applied over the next physics step
    fn apply_torque(&mut self, torque: Vec3);
    fn velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn world_position(&self) -> Vec3;
    fn world_rotation(&self) -> Quat;
    /// Teleport the body and zero both velocities
    fn reset(&mut self, position: Vec3, rotation: Quat);
}

/// Local-space outward face normals. Index `i` carries nominal value `i + 1`,
/// and index `i` is opposite index `5 - i`, so opposite values sum to 7.
pub const FACE_NORMALS: [Vec3; 6] = [
    Vec3::Z,     // 1
    Vec3::NEG_Y, // 2
    Vec3::X,     // 3
    Vec3::NEG_X, // 4
    Vec3::Y,     // 5
    Vec3::NEG_Z, // 6
];

/// One simulated die
#[derive(Debug, Clone)]
pub struct Die<B: RigidBody> {
    pub id: u32,
    pub body: B,
    pub face_normals: [Vec3; 6],
}

impl<B: RigidBody> Die<B> {
    pub fn new(id: u32, body: B) -> Self {
        Self::with_faces(id, body, FACE_NORMALS)
    }

    /// Die with a custom face layout (normals are normalized on the way in)
    pub fn with_faces(id: u32, body: B, face_normals: [Vec3; 6]) -> Self {
        Self {
            id,
            body,
            face_normals: face_normals.map(|n| n.normalize_or_zero()),
        }
    }

    /// Face value (1-6) currently showing; only meaningful once at rest
    pub fn face_value(&self) -> u8 {
        super::faces::resolve_face(self.body.world_rotation(), &self.face_normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normals_are_unit_and_opposite_pairs() {
        for (i, n) in FACE_NORMALS.iter().enumerate() {
            assert!((n.length() - 1.0).abs() < 1e-6);
            let opposite = FACE_NORMALS[5 - i];
            assert!((*n + opposite).length() < 1e-6, "face {} not opposite {}", i + 1, 6 - i);
        }
    }

    #[test]
    fn test_up_face_is_index_four() {
        assert_eq!(FACE_NORMALS[4], Vec3::Y);
    }
}
