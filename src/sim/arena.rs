//! Built-in damped rigid body
//!
//! A small Euler integrator standing in for a full physics engine: gravity,
//! a floor, four walls and a ceiling, with friction applied before forces and
//! tiny velocities snapped to zero. Enough for the dice to tumble and come to
//! rest so a round can complete without an external engine.

use glam::{Quat, Vec3};

use super::body::RigidBody;
use crate::consts::*;

/// Linear friction in the air (per second)
const AIR_FRICTION: f32 = 0.1;
/// Angular friction in the air (per second)
const AIR_ANGULAR_FRICTION: f32 = 0.3;
/// Extra friction while touching the floor
const GROUND_FRICTION: f32 = 4.0;
const GROUND_ANGULAR_FRICTION: f32 = 3.0;
/// Impact speed below which a floor contact stops instead of bouncing
const BOUNCE_CUTOFF: f32 = 0.5;
/// Speeds below this are zeroed
const ZERO_VELOCITY: f32 = 1e-3;
/// Uniform cube inertia about its center: m * s² / 6
const DIE_INERTIA: f32 = DIE_MASS * DIE_SIZE * DIE_SIZE / 6.0;

/// A cube of side `DIE_SIZE` integrated with damped Euler steps
#[derive(Debug, Clone)]
pub struct DampedBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Torque accumulated since the last step
    pending_torque: Vec3,
    /// True if the last step ended touching the floor
    pub grounded: bool,
}

impl DampedBody {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            pending_torque: Vec3::ZERO,
            grounded: false,
        }
    }

    /// Advance the body by one fixed timestep
    pub fn step(&mut self, dt: f32) {
        let half = DIE_SIZE / 2.0;

        // Friction first, then forces
        self.velocity /= 1.0 + dt * AIR_FRICTION;
        self.velocity.y += GRAVITY * dt;

        self.angular_velocity /= 1.0 + dt * AIR_ANGULAR_FRICTION;
        self.angular_velocity += self.pending_torque / DIE_INERTIA * dt;
        self.pending_torque = Vec3::ZERO;

        self.position += self.velocity * dt;
        self.rotation = integrate_rotation(self.rotation, self.angular_velocity, dt);

        // Floor
        self.grounded = false;
        let floor = FLOOR_Y + half;
        if self.position.y <= floor {
            self.position.y = floor;
            self.grounded = true;
            if self.velocity.y < 0.0 {
                self.velocity.y = if -self.velocity.y < BOUNCE_CUTOFF {
                    0.0
                } else {
                    -self.velocity.y * FLOOR_RESTITUTION
                };
            }
            let ground = 1.0 + dt * GROUND_FRICTION;
            self.velocity.x /= ground;
            self.velocity.z /= ground;
            self.angular_velocity /= 1.0 + dt * GROUND_ANGULAR_FRICTION;
        }

        // Ceiling
        let ceiling = FLOOR_Y + WALL_HEIGHT - half;
        if self.position.y > ceiling {
            self.position.y = ceiling;
            if self.velocity.y > 0.0 {
                self.velocity.y = -self.velocity.y * FLOOR_RESTITUTION;
            }
        }

        // Walls
        let limit = ARENA_SIZE / 2.0 - half;
        for axis in [0, 2] {
            let p = self.position[axis];
            if p.abs() > limit {
                self.position[axis] = limit.copysign(p);
                if self.velocity[axis] * p > 0.0 {
                    self.velocity[axis] = -self.velocity[axis] * WALL_RESTITUTION;
                }
            }
        }

        if self.velocity.length() < ZERO_VELOCITY {
            self.velocity = Vec3::ZERO;
        }
        if self.angular_velocity.length() < ZERO_VELOCITY {
            self.angular_velocity = Vec3::ZERO;
        }
    }
}

impl RigidBody for DampedBody {
    fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        self.velocity += impulse / DIE_MASS;
        let arm = world_point - self.position;
        self.angular_velocity += arm.cross(impulse) / DIE_INERTIA;
    }

    fn apply_torque(&mut self, torque: Vec3) {
        self.pending_torque += torque;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn world_position(&self) -> Vec3 {
        self.position
    }

    fn world_rotation(&self) -> Quat {
        self.rotation
    }

    fn reset(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation.normalize();
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.pending_torque = Vec3::ZERO;
        self.grounded = false;
    }
}

/// q' = normalize(q + dt/2 * (ω, 0) * q)
fn integrate_rotation(rotation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    if angular_velocity == Vec3::ZERO {
        return rotation;
    }
    let omega = Quat::from_xyzw(angular_velocity.x, angular_velocity.y, angular_velocity.z, 0.0);
    let spin = omega * rotation;
    let q = Quat::from_xyzw(
        rotation.x + 0.5 * dt * spin.x,
        rotation.y + 0.5 * dt * spin.y,
        rotation.z + 0.5 * dt * spin.z,
        rotation.w + 0.5 * dt * spin.w,
    );
    q.normalize()
}
