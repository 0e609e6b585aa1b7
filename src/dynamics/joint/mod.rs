//! Bilateral joint constraints.
//!
//! Every joint kind exposes the same three-hook interface spec.md
//! mandates: `pre_solve`, `solve_velocity`, `solve_position`. Revolute and
//! distance joints are fully implemented; the remaining five kinds are
//! placeholders whose hooks are documented no-ops (constructing one
//! succeeds — the joint can still be attached for bookkeeping/debug
//! purposes — but its hooks never touch a body).

mod distance_joint;
mod revolute_joint;
mod stub_joint;

pub use distance_joint::DistanceJoint;
pub use revolute_joint::RevoluteJoint;
pub use stub_joint::StubJoint;

use crate::data::arena::{Arena, Index};
use crate::dynamics::integration_parameters::IntegrationParameters;
use crate::dynamics::rigid_body_set::{RigidBodyHandle, RigidBodySet};
use crate::error::PhysicsError;
use crate::math::Vec2;

/// A stable reference to a joint owned by a [`crate::world::World`].
pub type JointHandle = Index;

/// The kind of constraint a joint implements, used for the `Unsupported`
/// error and debug introspection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JointKind {
    Revolute,
    Distance,
    Prismatic,
    Weld,
    Pulley,
    Gear,
    Mouse,
}

/// Tagged union over every joint kind this crate can attach to a world.
pub enum JointParams {
    Revolute(RevoluteJoint),
    Distance(DistanceJoint),
    Prismatic(StubJoint),
    Weld(StubJoint),
    Pulley(StubJoint),
    Gear(StubJoint),
    Mouse(StubJoint),
}

impl JointParams {
    pub fn kind(&self) -> JointKind {
        match self {
            JointParams::Revolute(_) => JointKind::Revolute,
            JointParams::Distance(_) => JointKind::Distance,
            JointParams::Prismatic(_) => JointKind::Prismatic,
            JointParams::Weld(_) => JointKind::Weld,
            JointParams::Pulley(_) => JointKind::Pulley,
            JointParams::Gear(_) => JointKind::Gear,
            JointParams::Mouse(_) => JointKind::Mouse,
        }
    }

    pub fn bodies(&self) -> (RigidBodyHandle, RigidBodyHandle) {
        match self {
            JointParams::Revolute(j) => (j.body_a, j.body_b),
            JointParams::Distance(j) => (j.body_a, j.body_b),
            JointParams::Prismatic(j)
            | JointParams::Weld(j)
            | JointParams::Pulley(j)
            | JointParams::Gear(j)
            | JointParams::Mouse(j) => (j.body_a, j.body_b),
        }
    }

    /// World-space anchor points, for the debug interface. Stub joints
    /// report their (non-functional) construction-time anchors.
    pub fn world_anchors(&self, bodies: &RigidBodySet) -> Option<(Vec2, Vec2)> {
        match self {
            JointParams::Revolute(j) => j.world_anchors(bodies).ok(),
            JointParams::Distance(j) => j.world_anchors(bodies).ok(),
            JointParams::Prismatic(j)
            | JointParams::Weld(j)
            | JointParams::Pulley(j)
            | JointParams::Gear(j)
            | JointParams::Mouse(j) => j.world_anchors(bodies).ok(),
        }
    }

    pub(crate) fn pre_solve(&mut self, params: &IntegrationParameters, bodies: &mut RigidBodySet) {
        match self {
            JointParams::Revolute(j) => j.pre_solve(params, bodies),
            JointParams::Distance(j) => j.pre_solve(params, bodies),
            JointParams::Prismatic(j)
            | JointParams::Weld(j)
            | JointParams::Pulley(j)
            | JointParams::Gear(j)
            | JointParams::Mouse(j) => j.pre_solve(params, bodies),
        }
    }

    pub(crate) fn solve_velocity(&mut self, params: &IntegrationParameters, bodies: &mut RigidBodySet) {
        match self {
            JointParams::Revolute(j) => j.solve_velocity(params, bodies),
            JointParams::Distance(j) => j.solve_velocity(params, bodies),
            JointParams::Prismatic(j)
            | JointParams::Weld(j)
            | JointParams::Pulley(j)
            | JointParams::Gear(j)
            | JointParams::Mouse(j) => j.solve_velocity(params, bodies),
        }
    }

    pub(crate) fn solve_position(&mut self, bodies: &mut RigidBodySet) {
        match self {
            JointParams::Revolute(j) => j.solve_position(bodies),
            JointParams::Distance(j) => j.solve_position(bodies),
            JointParams::Prismatic(j)
            | JointParams::Weld(j)
            | JointParams::Pulley(j)
            | JointParams::Gear(j)
            | JointParams::Mouse(j) => j.solve_position(bodies),
        }
    }
}

/// Owns every joint in a world.
#[derive(Default)]
pub struct JointSet {
    arena: Arena<JointParams>,
}

impl JointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: JointParams) -> JointHandle {
        self.arena.insert(joint)
    }

    pub fn remove(&mut self, handle: JointHandle) -> Result<JointParams, PhysicsError> {
        self.arena.remove(handle).ok_or(PhysicsError::NotFound)
    }

    pub fn get(&self, handle: JointHandle) -> Result<&JointParams, PhysicsError> {
        self.arena.get(handle).ok_or(PhysicsError::NotFound)
    }

    pub fn get_mut(&mut self, handle: JointHandle) -> Result<&mut JointParams, PhysicsError> {
        self.arena.get_mut(handle).ok_or(PhysicsError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointHandle, &JointParams)> {
        self.arena.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (JointHandle, &mut JointParams)> {
        self.arena.iter_mut()
    }

    /// Drops every joint touching `handle`, mirroring
    /// `ContactPairSet::remove_touching` for body removal.
    pub fn remove_touching(&mut self, handle: RigidBodyHandle) {
        let doomed: Vec<JointHandle> = self
            .arena
            .iter()
            .filter(|(_, j)| {
                let (a, b) = j.bodies();
                a == handle || b == handle
            })
            .map(|(h, _)| h)
            .collect();
        for h in doomed {
            self.arena.remove(h);
        }
    }
}
