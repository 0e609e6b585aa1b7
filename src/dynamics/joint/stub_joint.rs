//! Placeholder joint kinds: Prismatic, Weld, Pulley, Gear, Mouse.
//!
//! spec.md §3/§4.5 requires every joint kind to expose the same
//! `pre_solve`/`solve_velocity`/`solve_position` hooks, but only fully
//! specifies Revolute and Distance. The remaining five are attachable
//! (for bookkeeping and debug introspection — a host can still ask for
//! their kind and anchors) but their hooks are documented no-ops; nothing
//! here ever touches a body.

use crate::dynamics::integration_parameters::IntegrationParameters;
use crate::dynamics::rigid_body_set::{RigidBodyHandle, RigidBodySet};
use crate::error::PhysicsError;
use crate::math::Vec2;

pub struct StubJoint {
    pub(crate) body_a: RigidBodyHandle,
    pub(crate) body_b: RigidBodyHandle,
    local_anchor_a: Vec2,
    local_anchor_b: Vec2,
}

impl StubJoint {
    /// Records the two bodies and a pair of local anchors for debug
    /// introspection. Construction never fails on its own, but every
    /// solve hook is a no-op — `World::add_joint` raises
    /// `PhysicsError::Unsupported` before one of these ever reaches the
    /// solver dispatch.
    pub fn new(
        bodies: &RigidBodySet,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        world_anchor: Vec2,
    ) -> Result<Self, PhysicsError> {
        let a = bodies.get(body_a)?;
        let b = bodies.get(body_b)?;
        Ok(Self {
            body_a,
            body_b,
            local_anchor_a: a.transform().inverse_apply(world_anchor),
            local_anchor_b: b.transform().inverse_apply(world_anchor),
        })
    }

    pub fn world_anchors(&self, bodies: &RigidBodySet) -> Result<(Vec2, Vec2), PhysicsError> {
        let a = bodies.get(self.body_a)?;
        let b = bodies.get(self.body_b)?;
        Ok((
            a.transform().apply(self.local_anchor_a),
            b.transform().apply(self.local_anchor_b),
        ))
    }

    pub(crate) fn pre_solve(&mut self, _params: &IntegrationParameters, _bodies: &mut RigidBodySet) {}

    pub(crate) fn solve_velocity(&mut self, _params: &IntegrationParameters, _bodies: &mut RigidBodySet) {}

    pub(crate) fn solve_position(&mut self, _bodies: &mut RigidBodySet) {}
}
