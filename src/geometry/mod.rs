//! Shapes, bounding boxes, broad phase, narrowphase (SAT), and contact
//! persistence — the collision-detection half of the pipeline.

pub mod aabb;
pub mod broad_phase;
pub mod contact;
pub mod sat;
pub mod shape;

pub use aabb::Aabb;
pub use broad_phase::{BroadPhase, BroadPhaseProxy};
pub use contact::{ContactPairSet, ContactPoint, Manifold, PairKey, PersistentContact, PersistentPoint};
pub use sat::collide as sat_collide;
pub use shape::Shape;
