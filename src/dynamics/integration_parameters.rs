//! Tunables for one `World`: time step, iteration counts, and the solver
//! constants spec.md's source carried as scattered magic numbers across
//! duplicated files. Picking one default and exposing the rest as
//! configuration (rather than a compile-time constant) is this crate's
//! resolution of that duplication.

use crate::error::PhysicsError;
use crate::math::Real;

/// Default Baumgarte stabilization factor.
pub const DEFAULT_BAUMGARTE: Real = 0.2;
/// Default allowed penetration ("slop") below which no positional
/// correction bias is applied.
pub const DEFAULT_SLOP: Real = 0.01;
/// Default static friction coefficient used when a body doesn't specify
/// its own (bodies always specify their own in this crate; this constant
/// documents the value `RigidBodyBuilder::default()` used to combine
/// against historically, and is kept for callers building their own
/// friction tables).
pub const DEFAULT_STATIC_FRICTION: Real = 0.6;
pub const DEFAULT_DYNAMIC_FRICTION: Real = 0.4;

/// Tolerance, as a fraction of total accumulated impulse, below which a
/// velocity-iteration pass may exit early.
pub const DEFAULT_CONVERGENCE_TOLERANCE: Real = 1.0e-3;

/// Linear/angular speed thresholds and consecutive-step count used by the
/// sleep criterion (see `RigidBodySet`/`IslandManager`).
pub const DEFAULT_SLEEP_LINEAR_THRESHOLD: Real = 0.05;
pub const DEFAULT_SLEEP_ANGULAR_THRESHOLD: Real = 0.05;
pub const DEFAULT_SLEEP_STEPS: u32 = 30;

/// Per-world solver configuration.
#[derive(Copy, Clone, Debug)]
pub struct IntegrationParameters {
    pub dt: Real,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub baumgarte: Real,
    pub slop: Real,
    pub convergence_tolerance: Real,
    pub sleep_linear_threshold: Real,
    pub sleep_angular_threshold: Real,
    pub sleep_steps: u32,
    pub allow_sleeping: bool,
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            velocity_iterations: 8,
            position_iterations: 3,
            baumgarte: DEFAULT_BAUMGARTE,
            slop: DEFAULT_SLOP,
            convergence_tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
            sleep_linear_threshold: DEFAULT_SLEEP_LINEAR_THRESHOLD,
            sleep_angular_threshold: DEFAULT_SLEEP_ANGULAR_THRESHOLD,
            sleep_steps: DEFAULT_SLEEP_STEPS,
            allow_sleeping: true,
        }
    }
}

impl IntegrationParameters {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if self.velocity_iterations == 0 {
            return Err(PhysicsError::InvalidArgument(
                "velocity_iterations must be positive".into(),
            ));
        }
        if self.position_iterations == 0 {
            return Err(PhysicsError::InvalidArgument(
                "position_iterations must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn inv_dt(&self) -> Real {
        if self.dt > 0.0 {
            1.0 / self.dt
        } else {
            0.0
        }
    }
}
