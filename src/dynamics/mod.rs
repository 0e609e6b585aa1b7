//! Rigid bodies, joints, islands, and the sequential-impulse solver — the
//! half of the pipeline that turns contacts and constraints into velocity
//! and position changes.

pub mod integration_parameters;
pub mod island_manager;
pub mod joint;
pub mod rigid_body;
pub mod rigid_body_set;
pub mod solver;

pub use integration_parameters::IntegrationParameters;
pub use island_manager::{build_islands, wake_connected_bodies, Island};
pub use joint::{JointHandle, JointKind, JointParams, JointSet};
pub use rigid_body::{RigidBody, RigidBodyBuilder, RigidBodyType};
pub use rigid_body_set::{RigidBodyHandle, RigidBodySet};
