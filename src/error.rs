//! The crate-wide error taxonomy.
//!
//! `InvalidArgument` and `NotFound` are reported before any state is
//! touched. `NumericalFailure` is raised only after a step has already
//! mutated velocities/positions; see [`crate::world::World::step`] for how
//! the world recovers.

use crate::dynamics::joint::JointKind;

/// Errors produced by the public API.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// A caller-supplied argument violates a documented precondition
    /// (degenerate polygon, non-positive mass, negative restitution or
    /// friction, non-positive `dt` or iteration count).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A handle does not refer to a body/joint owned by this `World`.
    #[error("handle is not owned by this world")]
    NotFound,

    /// A derived quantity became NaN or infinite during a step (e.g. an
    /// unrecoverable mass-matrix singularity, or velocity blowing up past
    /// the sanity bound). The step that raised this has been rolled back.
    #[error("numerical failure during step: {0}")]
    NumericalFailure(String),

    /// The caller asked for a joint kind whose solver is a documented
    /// no-op placeholder.
    #[error("joint kind {0:?} has no solver implementation")]
    Unsupported(JointKind),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
