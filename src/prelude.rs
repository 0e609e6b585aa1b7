//! Convenience re-exports for the most common entry points, in the style
//! rapier's own `prelude` module uses.

pub use crate::dynamics::{
    IntegrationParameters, JointHandle, JointKind, JointParams, RigidBody, RigidBodyBuilder,
    RigidBodyHandle, RigidBodyType,
};
pub use crate::dynamics::joint::{DistanceJoint, RevoluteJoint};
pub use crate::error::{PhysicsError, PhysicsResult};
pub use crate::geometry::{Aabb, ContactPoint, Manifold, PersistentContact, Shape};
pub use crate::math::{Mat22, Real, Transform, Vec2};
pub use crate::world::World;
