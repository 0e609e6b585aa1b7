//! Per-island iteration loop: warm start and velocity iterations over
//! contacts and joints (§4.4 step 2), split from the position-correction
//! pass (§4.4 step 4) so the pipeline can run position integration (§4.7
//! step 3) between the two, matching the ordering spec.md §4.4 gives:
//! integrate positions, *then* iterate position corrections.

use crate::dynamics::integration_parameters::IntegrationParameters;
use crate::dynamics::island_manager::Island;
use crate::dynamics::joint::JointSet;
use crate::dynamics::rigid_body_set::RigidBodySet;
use crate::dynamics::solver::contact_solver;
use crate::geometry::contact::{ContactPairSet, PairKey};
use crate::math::Real;

/// Runs one island's velocity phase: pre-solve joints, warm-start
/// contacts, then `velocity_iterations` passes over contacts+joints (with
/// early exit on small total impulse change). Positions are not touched
/// here; call [`solve_island_positions`] after the pipeline integrates
/// positions.
pub fn solve_island_velocity(
    island: &Island,
    params: &IntegrationParameters,
    bodies: &mut RigidBodySet,
    joints: &mut JointSet,
    contacts: &mut ContactPairSet,
) {
    for &joint_handle in &island.joints {
        if let Ok(joint) = joints.get_mut(joint_handle) {
            joint.pre_solve(params, bodies);
        }
    }

    for &(a, b) in &island.contacts {
        let key = PairKey::new(a, b);
        if let Some(contact) = contacts.get_mut(key) {
            let _ = contact_solver::warm_start(contact, bodies);
        }
    }

    for _ in 0..params.velocity_iterations {
        let mut total_delta = 0.0 as Real;

        for &(a, b) in &island.contacts {
            let key = PairKey::new(a, b);
            if let Some(contact) = contacts.get_mut(key) {
                if let Ok(delta) = contact_solver::solve_velocity(
                    contact,
                    bodies,
                    params.baumgarte,
                    params.slop,
                    params.inv_dt(),
                ) {
                    total_delta += delta;
                }
            }
        }

        for &joint_handle in &island.joints {
            if let Ok(joint) = joints.get_mut(joint_handle) {
                joint.solve_velocity(params, bodies);
            }
        }

        if total_delta < params.convergence_tolerance {
            break;
        }
    }
}

/// Runs one island's position-correction phase: `position_iterations`
/// passes of joint NGS position correction. Must run after the pipeline's
/// position integration step, per §4.4.
pub fn solve_island_positions(island: &Island, params: &IntegrationParameters, bodies: &mut RigidBodySet, joints: &mut JointSet) {
    for _ in 0..params.position_iterations {
        for &joint_handle in &island.joints {
            if let Ok(joint) = joints.get_mut(joint_handle) {
                joint.solve_position(bodies);
            }
        }
    }
}
