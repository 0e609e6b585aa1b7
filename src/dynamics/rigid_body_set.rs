//! Handle-stable storage for rigid bodies.

use crate::data::arena::{Arena, Index};
use crate::dynamics::rigid_body::RigidBody;
use crate::error::PhysicsError;

/// A stable reference to a body owned by a [`crate::world::World`].
pub type RigidBodyHandle = Index;

/// Owns every rigid body in a world. Removal invalidates only the handle
/// that was removed; every other handle keeps resolving to its body.
#[derive(Default)]
pub struct RigidBodySet {
    arena: Arena<RigidBody>,
}

impl RigidBodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.arena.insert(body)
    }

    pub fn remove(&mut self, handle: RigidBodyHandle) -> Result<RigidBody, PhysicsError> {
        self.arena.remove(handle).ok_or(PhysicsError::NotFound)
    }

    pub fn get(&self, handle: RigidBodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.arena.get(handle).ok_or(PhysicsError::NotFound)
    }

    pub fn get_mut(&mut self, handle: RigidBodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.arena.get_mut(handle).ok_or(PhysicsError::NotFound)
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.arena.contains(handle)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.arena.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RigidBodyHandle, &mut RigidBody)> {
        self.arena.iter_mut()
    }

    /// Mutably borrows two distinct bodies at once, the two-body pattern
    /// every sequential-impulse solver needs (apply equal-and-opposite
    /// impulses to A and B in one pass).
    pub fn get_pair_mut(
        &mut self,
        a: RigidBodyHandle,
        b: RigidBodyHandle,
    ) -> Result<(&mut RigidBody, &mut RigidBody), PhysicsError> {
        self.arena.get_pair_mut(a, b).ok_or(PhysicsError::NotFound)
    }
}
