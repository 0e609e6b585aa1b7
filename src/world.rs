//! The public facade (§6): owns every body, joint, and persistent
//! contact, and drives the fixed-step pipeline.

use crate::dynamics::joint::{JointHandle, JointKind, JointParams, JointSet};
use crate::dynamics::rigid_body::RigidBody;
use crate::dynamics::rigid_body_set::{RigidBodyHandle, RigidBodySet};
use crate::dynamics::IntegrationParameters;
use crate::error::{PhysicsError, PhysicsResult};
use crate::geometry::broad_phase::BroadPhase;
use crate::geometry::contact::{ContactPairSet, PersistentContact};
use crate::math::{Real, Vec2};
use crate::pipeline::PhysicsPipeline;

/// The top-level simulation. Owns its bodies, joints, and persistent
/// contacts exclusively (§5) — nothing else in this crate holds a
/// reference across a `step()` call.
pub struct World {
    gravity: Vec2,
    params: IntegrationParameters,
    bodies: RigidBodySet,
    joints: JointSet,
    broad_phase: BroadPhase,
    contacts: ContactPairSet,
    pipeline: PhysicsPipeline,
}

/// A plain snapshot of one body's integrated state, used to roll the
/// whole world back if a step produces a `NumericalFailure` (§7: the
/// step that raised it must not leave NaN in place for the next one).
struct BodySnapshot {
    handle: RigidBodyHandle,
    position: Vec2,
    rotation: Real,
    linear_velocity: Vec2,
    angular_velocity: Real,
}

impl World {
    /// Builds an empty world with the given gravity and solver
    /// configuration. `config` is validated immediately; an invalid
    /// `dt`/iteration count is rejected here rather than on the first
    /// `step()` call.
    pub fn new(gravity: Vec2, config: IntegrationParameters) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Self {
            gravity,
            params: config,
            bodies: RigidBodySet::new(),
            joints: JointSet::new(),
            broad_phase: BroadPhase::new(),
            contacts: ContactPairSet::new(),
            pipeline: PhysicsPipeline::new(),
        })
    }

    pub fn add_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.bodies.insert(body)
    }

    /// Removes a body and every contact/joint touching it. Errors
    /// without mutating the world if `handle` isn't owned by it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> PhysicsResult<RigidBody> {
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::NotFound);
        }
        self.joints.remove_touching(handle);
        self.contacts.remove_touching(handle);
        self.bodies.remove(handle)
    }

    /// Attaches a joint. Placeholder joint kinds (Prismatic, Weld,
    /// Pulley, Gear, Mouse) are rejected here with `Unsupported` rather
    /// than silently accepted and then doing nothing every step — the
    /// one place a caller could get a false sense of support.
    pub fn add_joint(&mut self, joint: JointParams) -> PhysicsResult<JointHandle> {
        if matches!(
            joint.kind(),
            JointKind::Prismatic | JointKind::Weld | JointKind::Pulley | JointKind::Gear | JointKind::Mouse
        ) {
            return Err(PhysicsError::Unsupported(joint.kind()));
        }
        Ok(self.joints.insert(joint))
    }

    pub fn remove_joint(&mut self, handle: JointHandle) -> PhysicsResult<()> {
        self.joints.remove(handle)?;
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn integration_parameters(&self) -> &IntegrationParameters {
        &self.params
    }

    pub fn body(&self, handle: RigidBodyHandle) -> PhysicsResult<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> PhysicsResult<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.bodies.iter()
    }

    /// The underlying body set, for joint constructors (`RevoluteJoint::new`,
    /// `DistanceJoint::new`) that need to read two bodies' poses to derive
    /// local anchors before the joint is handed to `add_joint`.
    pub fn bodies_set(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub fn joints(&self) -> impl Iterator<Item = (JointHandle, &JointParams)> {
        self.joints.iter()
    }

    /// Read-only view over active persistent contacts, for the external
    /// debug renderer (§6): normal, point(s), and depth per contact.
    pub fn contacts(&self) -> impl Iterator<Item = &PersistentContact> {
        self.contacts.iter()
    }

    /// Advances the simulation by `dt`, using the world's configured
    /// iteration counts.
    pub fn step(&mut self, dt: Real) -> PhysicsResult<()> {
        self.step_with_iterations(dt, self.params.velocity_iterations, self.params.position_iterations)
    }

    /// Advances the simulation by `dt` with an explicit iteration-count
    /// override for this call only (the world's stored defaults are
    /// unchanged). `dt` and both iteration counts are validated before
    /// any state is touched (§7).
    pub fn step_with_iterations(&mut self, dt: Real, vel_iters: u32, pos_iters: u32) -> PhysicsResult<()> {
        let mut params = self.params;
        params.dt = dt;
        params.velocity_iterations = vel_iters;
        params.position_iterations = pos_iters;
        params.validate()?;

        let snapshot: Vec<BodySnapshot> = self
            .bodies
            .iter()
            .map(|(handle, body)| BodySnapshot {
                handle,
                position: body.translation(),
                rotation: body.rotation(),
                linear_velocity: body.linear_velocity(),
                angular_velocity: body.angular_velocity(),
            })
            .collect();

        let result = self.pipeline.step(
            self.gravity,
            &params,
            &mut self.bodies,
            &mut self.joints,
            &mut self.broad_phase,
            &mut self.contacts,
        );

        if let Err(err) = result {
            self.restore(&snapshot);
            return Err(err);
        }
        Ok(())
    }

    fn restore(&mut self, snapshot: &[BodySnapshot]) {
        for s in snapshot {
            if let Ok(body) = self.bodies.get_mut(s.handle) {
                // Direct field writes (not the `set_*` accessors): this
                // is a rollback, not user input, and must not disturb
                // sleep state or run wake bookkeeping.
                body.position = s.position;
                body.rotation = s.rotation;
                body.linear_velocity = s.linear_velocity;
                body.angular_velocity = s.angular_velocity;
            }
        }
    }
}
