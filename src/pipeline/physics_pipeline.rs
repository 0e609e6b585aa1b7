//! The fixed-step pipeline (§4.7): apply external forces and integrate
//! velocities, broadphase, narrowphase, contact persistence, island
//! building, per-island solve, integrate positions, clear accumulators.

use crate::dynamics::integration_parameters::IntegrationParameters;
use crate::dynamics::joint::JointSet;
use crate::dynamics::rigid_body_set::RigidBodySet;
use crate::dynamics::solver::island_solver;
use crate::dynamics::{island_manager, RigidBodyHandle};
use crate::error::PhysicsError;
use crate::geometry::broad_phase::{BroadPhase, BroadPhaseProxy};
use crate::geometry::contact::ContactPairSet;
use crate::geometry::sat;
use crate::math::Vec2;

/// Stateless orchestrator for one `World::step` call. Holds no
/// simulation data of its own; `broad_phase` is threaded in from `World`
/// purely so its internal proxy buffer is reused between steps instead
/// of reallocated.
#[derive(Default)]
pub struct PhysicsPipeline;

impl PhysicsPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Runs the eight ordered stages of §4.7 against the given world
    /// state. `gravity` is used verbatim (the sign convention is the
    /// caller's choice, per spec.md §9). Returns `Err` if any body's
    /// state goes non-finite after integration; the caller is expected
    /// to restore the pre-step snapshot in that case.
    pub fn step(
        &mut self,
        gravity: Vec2,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        joints: &mut JointSet,
        broad_phase: &mut BroadPhase,
        contacts: &mut ContactPairSet,
    ) -> Result<(), PhysicsError> {
        // 1 + 2. External forces (gravity folded directly into the
        // per-body integrate step) and semi-implicit Euler velocity
        // integration.
        for (_, body) in bodies.iter_mut() {
            body.integrate_velocity(gravity, params.dt);
        }

        // 3. Broadphase.
        let proxies: Vec<BroadPhaseProxy> = bodies
            .iter()
            .map(|(handle, body)| BroadPhaseProxy {
                handle,
                aabb: body.world_aabb(),
                dynamic: !body.is_fixed(),
            })
            .collect();
        let candidate_pairs = broad_phase.find_pairs(proxies);
        log::trace!("broad phase produced {} candidate pairs", candidate_pairs.len());

        // 4. Narrowphase + contact persistence.
        let mut manifolds = Vec::new();
        for (a, b) in candidate_pairs {
            let (Ok(body_a), Ok(body_b)) = (bodies.get(a), bodies.get(b)) else {
                continue;
            };
            if let Some(manifold) = sat::collide(body_a.shape(), body_a.transform(), body_b.shape(), body_b.transform()) {
                manifolds.push((a, b, manifold));
            }
        }
        log::trace!("narrow phase produced {} manifolds", manifolds.len());
        contacts.sync(&manifolds, |a, b| combine_material(bodies, a, b));

        // Wake any sleeping body touching an awake one before islands are
        // built, so it participates in this step's solve.
        island_manager::wake_connected_bodies(bodies, joints, contacts);

        // 5. Islands.
        let islands = island_manager::build_islands(bodies, joints, contacts);
        log::trace!("built {} islands", islands.len());

        // 6. Per-island solve, velocity phase: pre-solve joints, warm
        // start, velocity iterations.
        for island in &islands {
            island_solver::solve_island_velocity(island, params, bodies, joints, contacts);
        }

        // 7. Integrate positions (§4.4 step 3 precedes step 4's position
        // iterations).
        for (_, body) in bodies.iter_mut() {
            body.integrate_position(params.dt);
        }

        // Per-island solve, position phase: joint NGS position correction
        // against the just-integrated poses.
        for island in &islands {
            island_solver::solve_island_positions(island, params, bodies, joints);
        }

        // 8. Clear accumulators, then update the sleep criterion.
        for (_, body) in bodies.iter_mut() {
            body.clear_accumulators();
            body.update_sleep_state(
                params.dt,
                params.sleep_linear_threshold,
                params.sleep_angular_threshold,
                params.sleep_steps,
                params.allow_sleeping,
            );
        }

        check_numerical_failure(bodies)
    }
}

fn combine_material(bodies: &RigidBodySet, a: RigidBodyHandle, b: RigidBodyHandle) -> (crate::math::Real, crate::math::Real) {
    let (Ok(body_a), Ok(body_b)) = (bodies.get(a), bodies.get(b)) else {
        return (0.0, 0.0);
    };
    let restitution = body_a.restitution().min(body_b.restitution());
    let friction = (body_a.friction() * body_b.friction()).max(0.0).sqrt();
    (restitution, friction)
}

fn check_numerical_failure(bodies: &RigidBodySet) -> Result<(), PhysicsError> {
    for (_, body) in bodies.iter() {
        if !body.is_state_finite() {
            log::warn!("numerical failure: body state went non-finite during step");
            return Err(PhysicsError::NumericalFailure(
                "a body's position or velocity became NaN or infinite".into(),
            ));
        }
    }
    Ok(())
}
