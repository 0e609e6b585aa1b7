//! Warm-started sequential-impulse normal + friction solve for one
//! persistent contact (§4.4).
//!
//! Normal and friction are solved per point, normal first then friction
//! in the same pass, so the friction clamp always uses this iteration's
//! updated `J_n` rather than last iteration's value.

use crate::dynamics::rigid_body::RigidBody;
use crate::dynamics::rigid_body_set::RigidBodySet;
use crate::error::PhysicsError;
use crate::geometry::contact::PersistentContact;
use crate::math::{Real, Vec2};

/// Inverse-mass-sum pairs below this are treated as "both bodies are
/// effectively static" and skipped, per spec.md §4.4's numerical
/// safeguard.
const MIN_EFFECTIVE_MASS: Real = 1.0e-6;

/// Applies this contact's previously-accumulated normal and tangent
/// impulses once, before the iterative phase. Subsequent iterations only
/// ever add deltas on top of what this applies.
pub fn warm_start(contact: &PersistentContact, bodies: &mut RigidBodySet) -> Result<(), PhysicsError> {
    let (a, b) = bodies.get_pair_mut(contact.body_a, contact.body_b)?;
    if a.inverse_mass() + b.inverse_mass() < MIN_EFFECTIVE_MASS {
        return Ok(());
    }
    let normal = contact.normal;
    let tangent = normal.perp();

    for point in &contact.points {
        let r_a = point.point - a.translation();
        let r_b = point.point - b.translation();
        let impulse = normal * point.normal_impulse + tangent * point.tangent_impulse;
        apply_pair_impulse(a, b, r_a, r_b, impulse);
    }
    Ok(())
}

/// One velocity-iteration pass over every point of this contact: solves
/// the normal constraint (non-negative clamp), then immediately the
/// friction constraint (Coulomb-capped against the just-updated normal
/// impulse). Returns the sum of `|delta|` across all points/axes, used by
/// the island solver's early-exit convergence check.
pub fn solve_velocity(
    contact: &mut PersistentContact,
    bodies: &mut RigidBodySet,
    baumgarte: Real,
    slop: Real,
    inv_dt: Real,
) -> Result<Real, PhysicsError> {
    let (a, b) = bodies.get_pair_mut(contact.body_a, contact.body_b)?;
    if a.inverse_mass() + b.inverse_mass() < MIN_EFFECTIVE_MASS {
        return Ok(0.0);
    }

    let normal = contact.normal;
    let tangent = normal.perp();
    let depth = contact.depth;
    let restitution = contact.restitution;
    let friction = contact.friction;
    let mut total_delta = 0.0 as Real;

    for point in contact.points.iter_mut() {
        let r_a = point.point - a.translation();
        let r_b = point.point - b.translation();

        let k_n = effective_mass(a, b, r_a, r_b, normal);
        if k_n < MIN_EFFECTIVE_MASS {
            continue;
        }

        let v_rel = relative_velocity(a, b, r_a, r_b);
        let v_n = v_rel.dot(normal);
        let bias = -(baumgarte * inv_dt) * (depth - slop).max(0.0);
        let delta_jn = (-(1.0 + restitution) * v_n + bias) / k_n;

        let new_jn = (point.normal_impulse + delta_jn).max(0.0);
        let applied_jn = new_jn - point.normal_impulse;
        point.normal_impulse = new_jn;
        total_delta += applied_jn.abs();
        apply_pair_impulse(a, b, r_a, r_b, normal * applied_jn);

        let k_t = effective_mass(a, b, r_a, r_b, tangent);
        if k_t < MIN_EFFECTIVE_MASS {
            continue;
        }
        let v_rel = relative_velocity(a, b, r_a, r_b);
        let v_t = v_rel.dot(tangent);
        let delta_jt = -v_t / k_t;

        let max_friction = friction * point.normal_impulse;
        let new_jt = (point.tangent_impulse + delta_jt).clamp(-max_friction, max_friction);
        let applied_jt = new_jt - point.tangent_impulse;
        point.tangent_impulse = new_jt;
        total_delta += applied_jt.abs();
        apply_pair_impulse(a, b, r_a, r_b, tangent * applied_jt);
    }

    Ok(total_delta)
}

#[inline]
fn relative_velocity(a: &RigidBody, b: &RigidBody, r_a: Vec2, r_b: Vec2) -> Vec2 {
    b.linear_velocity() + Vec2::cross_scalar_vec(b.angular_velocity(), r_b)
        - a.linear_velocity()
        - Vec2::cross_scalar_vec(a.angular_velocity(), r_a)
}

#[inline]
fn effective_mass(a: &RigidBody, b: &RigidBody, r_a: Vec2, r_b: Vec2, axis: Vec2) -> Real {
    let rn_a = r_a.cross(axis);
    let rn_b = r_b.cross(axis);
    a.inverse_mass() + b.inverse_mass() + a.inverse_inertia() * rn_a * rn_a + b.inverse_inertia() * rn_b * rn_b
}

#[inline]
fn apply_pair_impulse(a: &mut RigidBody, b: &mut RigidBody, r_a: Vec2, r_b: Vec2, impulse: Vec2) {
    let im_a = a.inverse_mass();
    let im_b = b.inverse_mass();
    let ii_a = a.inverse_inertia();
    let ii_b = b.inverse_inertia();
    a.apply_raw_velocity_delta(-impulse * im_a, -ii_a * r_a.cross(impulse));
    b.apply_raw_velocity_delta(impulse * im_b, ii_b * r_b.cross(impulse));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::rigid_body::RigidBodyBuilder;
    use crate::geometry::contact::{ContactPoint, Manifold};
    use crate::geometry::Shape;
    use crate::math::Vec2;

    fn two_body_contact() -> (RigidBodySet, PersistentContact) {
        let mut bodies = RigidBodySet::new();
        let ground_shape = Shape::box_shape(5.0, 1.0).unwrap();
        let ground = bodies
            .insert(RigidBodyBuilder::new(ground_shape).fixed().position(Vec2::new(0.0, -1.0)).build().unwrap());
        let circle_shape = Shape::circle(1.0).unwrap();
        let circle = bodies.insert(
            RigidBodyBuilder::new(circle_shape)
                .position(Vec2::new(0.0, 1.0))
                .linear_velocity(Vec2::new(0.0, -2.0))
                .restitution(0.0)
                .build()
                .unwrap(),
        );

        let mut manifold_points = arrayvec::ArrayVec::new();
        manifold_points.push(ContactPoint {
            point: Vec2::new(0.0, 0.0),
            id: 0,
        });
        let manifold = Manifold {
            normal: Vec2::new(0.0, 1.0),
            depth: 0.01,
            points: manifold_points,
        };

        let mut contacts = crate::geometry::contact::ContactPairSet::new();
        contacts.sync(&[(ground, circle, manifold)], |_, _| (0.0, 0.5));
        let contact = contacts.iter().next().unwrap();
        let persisted = PersistentContact {
            body_a: contact.body_a,
            body_b: contact.body_b,
            normal: contact.normal,
            depth: contact.depth,
            points: contact.points.clone(),
            restitution: contact.restitution,
            friction: contact.friction,
        };
        (bodies, persisted)
    }

    #[test]
    fn normal_impulse_stays_non_negative_and_stops_approach() {
        let (mut bodies, mut contact) = two_body_contact();
        for _ in 0..8 {
            solve_velocity(&mut contact, &mut bodies, 0.2, 0.01, 60.0).unwrap();
        }
        assert!(contact.points[0].normal_impulse >= 0.0);
        let circle = bodies.get(contact.body_b).unwrap();
        assert!(circle.linear_velocity().y > -2.0);
    }
}
