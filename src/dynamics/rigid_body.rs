//! Rigid bodies.

use crate::error::PhysicsError;
use crate::geometry::{Aabb, Shape};
use crate::math::{Real, Transform, Vec2};

/// Whether a body is moved by the solver or held immovable.
///
/// Only the two variants spec.md's data model calls for are implemented;
/// kinematic (script-driven, infinite-mass-but-moving) bodies are outside
/// this spec's scope and are not modeled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RigidBodyType {
    Dynamic,
    Fixed,
}

/// One rigid body: shape, pose, velocity, and the accumulators the solver
/// and integrator read and clear each step.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub(crate) shape: Shape,
    pub(crate) body_type: RigidBodyType,

    pub(crate) position: Vec2,
    pub(crate) rotation: Real,
    pub(crate) linear_velocity: Vec2,
    pub(crate) angular_velocity: Real,

    pub(crate) mass: Real,
    pub(crate) inverse_mass: Real,
    pub(crate) inertia: Real,
    pub(crate) inverse_inertia: Real,

    pub(crate) restitution: Real,
    pub(crate) friction: Real,

    pub(crate) force: Vec2,
    pub(crate) torque: Real,

    pub(crate) sleeping: bool,
    pub(crate) sleep_timer: Real,
}

/// Builds a [`RigidBody`], in the same fluent style as the rest of the
/// pack's physics crates (e.g. `RigidBodyBuilder` in rapier).
pub struct RigidBodyBuilder {
    shape: Shape,
    body_type: RigidBodyType,
    position: Vec2,
    rotation: Real,
    linear_velocity: Vec2,
    angular_velocity: Real,
    mass: Real,
    restitution: Real,
    friction: Real,
}

impl RigidBodyBuilder {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            body_type: RigidBodyType::Dynamic,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: 1.0,
            restitution: 0.0,
            friction: 0.6,
        }
    }

    pub fn fixed(mut self) -> Self {
        self.body_type = RigidBodyType::Fixed;
        self
    }

    pub fn position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Real) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn linear_velocity(mut self, v: Vec2) -> Self {
        self.linear_velocity = v;
        self
    }

    pub fn angular_velocity(mut self, w: Real) -> Self {
        self.angular_velocity = w;
        self
    }

    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = mass;
        self
    }

    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn build(self) -> Result<RigidBody, PhysicsError> {
        if self.body_type == RigidBodyType::Dynamic && !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "dynamic body mass must be finite and positive, got {}",
                self.mass
            )));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidArgument(format!(
                "restitution must be in [0, 1], got {}",
                self.restitution
            )));
        }
        if self.friction < 0.0 {
            return Err(PhysicsError::InvalidArgument(format!(
                "friction must be non-negative, got {}",
                self.friction
            )));
        }

        let (mass, inverse_mass, inertia, inverse_inertia) = match self.body_type {
            RigidBodyType::Fixed => (0.0, 0.0, 0.0, 0.0),
            RigidBodyType::Dynamic => {
                let inertia = self.shape.inertia(self.mass);
                let inverse_inertia = if inertia > Real::EPSILON {
                    1.0 / inertia
                } else {
                    0.0
                };
                (self.mass, 1.0 / self.mass, inertia, inverse_inertia)
            }
        };

        Ok(RigidBody {
            shape: self.shape,
            body_type: self.body_type,
            position: self.position,
            rotation: self.rotation,
            linear_velocity: if self.body_type == RigidBodyType::Fixed {
                Vec2::ZERO
            } else {
                self.linear_velocity
            },
            angular_velocity: if self.body_type == RigidBodyType::Fixed {
                0.0
            } else {
                self.angular_velocity
            },
            mass,
            inverse_mass,
            inertia,
            inverse_inertia,
            restitution: self.restitution,
            friction: self.friction,
            force: Vec2::ZERO,
            torque: 0.0,
            sleeping: false,
            sleep_timer: 0.0,
        })
    }
}

impl RigidBody {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    pub fn is_fixed(&self) -> bool {
        self.body_type == RigidBodyType::Fixed
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn translation(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> Real {
        self.rotation
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    pub fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Real {
        self.angular_velocity
    }

    pub fn mass(&self) -> Real {
        self.mass
    }

    pub fn inverse_mass(&self) -> Real {
        self.inverse_mass
    }

    pub fn inertia(&self) -> Real {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> Real {
        self.inverse_inertia
    }

    pub fn restitution(&self) -> Real {
        self.restitution
    }

    pub fn friction(&self) -> Real {
        self.friction
    }

    pub fn world_aabb(&self) -> Aabb {
        self.shape.aabb(self.transform())
    }

    /// The velocity of the material point at world-space `point`,
    /// including the contribution of angular velocity: `v + omega x r`.
    pub fn velocity_at_point(&self, point: Vec2) -> Vec2 {
        let r = point - self.position;
        self.linear_velocity + Vec2::cross_scalar_vec(self.angular_velocity, r)
    }

    pub fn set_translation(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Real) {
        self.rotation = rotation;
    }

    pub fn set_linear_velocity(&mut self, v: Vec2) {
        if !self.is_fixed() {
            self.linear_velocity = v;
            self.wake_up();
        }
    }

    pub fn set_angular_velocity(&mut self, w: Real) {
        if !self.is_fixed() {
            self.angular_velocity = w;
            self.wake_up();
        }
    }

    /// Adds a force at a world-space point: linear force plus the torque
    /// `r x F` it induces about the center of mass.
    pub fn apply_force_at_point(&mut self, force: Vec2, point: Vec2) {
        if self.is_fixed() {
            return;
        }
        self.force += force;
        self.torque += (point - self.position).cross(force);
        self.wake_up();
    }

    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_fixed() {
            return;
        }
        self.force += force;
        self.wake_up();
    }

    /// Adds an instantaneous impulse at a world-space point: changes
    /// linear and angular velocity directly, bypassing the force
    /// accumulator.
    pub fn apply_impulse_at_point(&mut self, impulse: Vec2, point: Vec2) {
        if self.is_fixed() {
            return;
        }
        let r = point - self.position;
        self.linear_velocity += impulse * self.inverse_mass;
        self.angular_velocity += self.inverse_inertia * r.cross(impulse);
        self.wake_up();
    }

    /// Adds directly to linear/angular velocity, bypassing the force
    /// accumulator and wake bookkeeping. Used by the contact and joint
    /// solvers, which already operate only on bodies an island has
    /// determined are active.
    pub(crate) fn apply_raw_velocity_delta(&mut self, linear_delta: Vec2, angular_delta: Real) {
        if self.is_fixed() {
            return;
        }
        self.linear_velocity += linear_delta;
        self.angular_velocity += angular_delta;
    }

    /// Adds directly to the body's position. Used by joint positional
    /// correction (non-linear Gauss-Seidel position solve).
    pub(crate) fn nudge_translation(&mut self, delta: Vec2) {
        if self.is_fixed() {
            return;
        }
        self.position += delta;
    }

    pub(crate) fn wake_up(&mut self) {
        self.sleeping = false;
        self.sleep_timer = 0.0;
    }

    /// `v += (F/m + gravity) dt`; `omega += (tau/I) dt`. Semi-implicit
    /// Euler: forces affect velocity before velocity affects position.
    pub(crate) fn integrate_velocity(&mut self, gravity: Vec2, dt: Real) {
        if self.is_fixed() || self.sleeping {
            return;
        }
        self.linear_velocity += (self.force * self.inverse_mass + gravity) * dt;
        self.angular_velocity += self.torque * self.inverse_inertia * dt;
    }

    pub(crate) fn integrate_position(&mut self, dt: Real) {
        if self.is_fixed() || self.sleeping {
            return;
        }
        self.position += self.linear_velocity * dt;
        self.rotation += self.angular_velocity * dt;
    }

    pub(crate) fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Standard sleep criterion: linear and angular speed below their
    /// thresholds for `sleep_steps` consecutive calls puts the body to
    /// sleep (velocities zeroed). Any motion above threshold resets the
    /// counter and keeps the body awake. No-op for fixed bodies, which
    /// are never asleep or awake — the concept doesn't apply to them.
    pub(crate) fn update_sleep_state(
        &mut self,
        dt: Real,
        linear_threshold: Real,
        angular_threshold: Real,
        sleep_steps: u32,
        allow_sleeping: bool,
    ) {
        if self.is_fixed() || self.sleeping {
            return;
        }
        if !allow_sleeping {
            self.sleep_timer = 0.0;
            return;
        }
        let under_threshold = self.linear_velocity.length_squared() < linear_threshold * linear_threshold
            && self.angular_velocity * self.angular_velocity < angular_threshold * angular_threshold;
        if under_threshold {
            self.sleep_timer += dt;
            if self.sleep_timer >= sleep_steps as Real * dt {
                self.sleeping = true;
                self.linear_velocity = Vec2::ZERO;
                self.angular_velocity = 0.0;
            }
        } else {
            self.sleep_timer = 0.0;
        }
    }

    /// `true` unless a derived velocity/position quantity went NaN or
    /// infinite, per spec.md §4.4's "NumericalFailure" invariant.
    pub(crate) fn is_state_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}
