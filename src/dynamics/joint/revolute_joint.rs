//! Revolute (pin) joint: fixes a common world anchor between two bodies,
//! allowing free relative rotation about it.

use crate::dynamics::integration_parameters::IntegrationParameters;
use crate::dynamics::rigid_body_set::{RigidBodyHandle, RigidBodySet};
use crate::error::PhysicsError;
use crate::math::{Mat22, Real, Vec2};

/// Magnitude cap on the accumulated joint impulse. A revolute joint's
/// velocity constraint has no natural sign or Coulomb clamp of its own
/// (unlike a contact's normal/friction impulses); this bound exists purely
/// to keep a degenerate configuration (near-zero effective mass, huge
/// relative velocity) from producing an unbounded impulse in one
/// iteration.
pub const MAX_JOINT_IMPULSE: Real = 200.0;

pub struct RevoluteJoint {
    pub(crate) body_a: RigidBodyHandle,
    pub(crate) body_b: RigidBodyHandle,
    local_anchor_a: Vec2,
    local_anchor_b: Vec2,
    impulse: Vec2,

    // Cached between pre_solve and solve_velocity.
    r_a: Vec2,
    r_b: Vec2,
    mass: Mat22,
    bias: Vec2,
}

impl RevoluteJoint {
    /// Builds a revolute joint pinning `body_a` and `body_b` together at
    /// `world_anchor`. The anchor is converted to each body's local frame
    /// immediately; subsequent motion is tracked via that local anchor.
    pub fn new(
        bodies: &RigidBodySet,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        world_anchor: Vec2,
    ) -> Result<Self, PhysicsError> {
        let a = bodies.get(body_a)?;
        let b = bodies.get(body_b)?;
        Ok(Self {
            body_a,
            body_b,
            local_anchor_a: a.transform().inverse_apply(world_anchor),
            local_anchor_b: b.transform().inverse_apply(world_anchor),
            impulse: Vec2::ZERO,
            r_a: Vec2::ZERO,
            r_b: Vec2::ZERO,
            mass: Mat22::new(Vec2::ZERO, Vec2::ZERO),
            bias: Vec2::ZERO,
        })
    }

    pub fn world_anchors(&self, bodies: &RigidBodySet) -> Result<(Vec2, Vec2), PhysicsError> {
        let a = bodies.get(self.body_a)?;
        let b = bodies.get(self.body_b)?;
        Ok((
            a.transform().apply(self.local_anchor_a),
            b.transform().apply(self.local_anchor_b),
        ))
    }

    pub(crate) fn pre_solve(&mut self, params: &IntegrationParameters, bodies: &mut RigidBodySet) {
        let Ok((a, b)) = bodies.get_pair_mut(self.body_a, self.body_b) else {
            return;
        };
        let anchor_a_w = a.transform().apply(self.local_anchor_a);
        let anchor_b_w = b.transform().apply(self.local_anchor_b);
        self.r_a = anchor_a_w - a.translation();
        self.r_b = anchor_b_w - b.translation();

        let im_a = a.inverse_mass();
        let im_b = b.inverse_mass();
        let ii_a = a.inverse_inertia();
        let ii_b = b.inverse_inertia();

        let k11 = im_a + im_b + ii_a * self.r_a.y * self.r_a.y + ii_b * self.r_b.y * self.r_b.y;
        let k12 = -ii_a * self.r_a.x * self.r_a.y - ii_b * self.r_b.x * self.r_b.y;
        let k22 = im_a + im_b + ii_a * self.r_a.x * self.r_a.x + ii_b * self.r_b.x * self.r_b.x;
        let k = Mat22::from_rows(k11, k12, k12, k22);

        self.mass = match k.inverse() {
            Some(_) => k,
            None => {
                // Fall back to an averaged diagonal approximation rather
                // than propagate a singular matrix into `solve`.
                let avg = 0.5 * (k11 + k22);
                Mat22::from_rows(avg.max(Real::EPSILON), 0.0, 0.0, avg.max(Real::EPSILON))
            }
        };

        self.bias = (anchor_b_w - anchor_a_w) * (-params.baumgarte * params.inv_dt());
    }

    pub(crate) fn solve_velocity(&mut self, _params: &IntegrationParameters, bodies: &mut RigidBodySet) {
        let Ok((a, b)) = bodies.get_pair_mut(self.body_a, self.body_b) else {
            return;
        };

        let v_rel = b.linear_velocity() + Vec2::cross_scalar_vec(b.angular_velocity(), self.r_b)
            - a.linear_velocity()
            - Vec2::cross_scalar_vec(a.angular_velocity(), self.r_a);

        let mut delta = self.mass.solve(-(v_rel + self.bias));
        let new_impulse = self.impulse + delta;
        let magnitude = new_impulse.length();
        let clamped = if magnitude > MAX_JOINT_IMPULSE {
            new_impulse * (MAX_JOINT_IMPULSE / magnitude)
        } else {
            new_impulse
        };
        delta = clamped - self.impulse;
        self.impulse = clamped;

        let im_a = a.inverse_mass();
        let im_b = b.inverse_mass();
        let ii_a = a.inverse_inertia();
        let ii_b = b.inverse_inertia();

        a.apply_raw_velocity_delta(-delta * im_a, -ii_a * self.r_a.cross(delta));
        b.apply_raw_velocity_delta(delta * im_b, ii_b * self.r_b.cross(delta));
    }

    pub(crate) fn solve_position(&mut self, bodies: &mut RigidBodySet) {
        let Ok((a, b)) = bodies.get_pair_mut(self.body_a, self.body_b) else {
            return;
        };
        let anchor_a_w = a.transform().apply(self.local_anchor_a);
        let anchor_b_w = b.transform().apply(self.local_anchor_b);
        let error = anchor_b_w - anchor_a_w;
        if error.length() <= 5.0e-3 {
            return;
        }

        let im_a = a.inverse_mass();
        let im_b = b.inverse_mass();
        let total = im_a + im_b;
        if total <= Real::EPSILON {
            return;
        }

        let correction = error * 0.5;
        a.nudge_translation(correction * (im_a / total));
        b.nudge_translation(-correction * (im_b / total));
    }
}
