//! Distance joint: holds two anchor points at a fixed separation `length`.

use crate::dynamics::integration_parameters::IntegrationParameters;
use crate::dynamics::rigid_body_set::{RigidBodyHandle, RigidBodySet};
use crate::error::PhysicsError;
use crate::math::{Real, Vec2};

/// Velocity-bias damping factor applied to the positional error term,
/// analogous to the revolute joint's Baumgarte bias but scalar since the
/// constraint itself is scalar (one degree of freedom: distance).
pub const DEFAULT_DAMPING: Real = 0.2;

pub struct DistanceJoint {
    pub(crate) body_a: RigidBodyHandle,
    pub(crate) body_b: RigidBodyHandle,
    local_anchor_a: Vec2,
    local_anchor_b: Vec2,
    length: Real,
    damping: Real,
    impulse: Real,

    // Cached between pre_solve and solve_velocity.
    r_a: Vec2,
    r_b: Vec2,
    normal: Vec2,
    inv_k: Real,
    bias: Real,
}

impl DistanceJoint {
    /// Builds a distance joint between the two bodies' given local
    /// anchors, holding them at `length` apart. `length` must be
    /// non-negative and finite.
    pub fn new(
        bodies: &RigidBodySet,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        local_anchor_a: Vec2,
        local_anchor_b: Vec2,
        length: Real,
    ) -> Result<Self, PhysicsError> {
        bodies.get(body_a)?;
        bodies.get(body_b)?;
        if !(length.is_finite() && length >= 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "distance joint length must be finite and non-negative, got {length}"
            )));
        }
        Ok(Self {
            body_a,
            body_b,
            local_anchor_a,
            local_anchor_b,
            length,
            damping: DEFAULT_DAMPING,
            impulse: 0.0,
            r_a: Vec2::ZERO,
            r_b: Vec2::ZERO,
            normal: Vec2::new(1.0, 0.0),
            inv_k: 0.0,
            bias: 0.0,
        })
    }

    /// Builds a distance joint anchored at the two bodies' world-space
    /// centers, with `length` set to their current separation.
    pub fn new_at_current_distance(
        bodies: &RigidBodySet,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
    ) -> Result<Self, PhysicsError> {
        let a = bodies.get(body_a)?;
        let b = bodies.get(body_b)?;
        let length = (b.translation() - a.translation()).length();
        Self::new(bodies, body_a, body_b, Vec2::ZERO, Vec2::ZERO, length)
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

        let delta = anchor_b_w - anchor_a_w;
        let dist = delta.length();
        self.normal = if dist > Real::EPSILON {
            delta / dist
        } else {
            Vec2::new(1.0, 0.0)
        };

        let im_a = a.inverse_mass();
        let im_b = b.inverse_mass();
        let ii_a = a.inverse_inertia();
        let ii_b = b.inverse_inertia();
        let rn_a = self.r_a.cross(self.normal);
        let rn_b = self.r_b.cross(self.normal);
        let k = im_a + im_b + ii_a * rn_a * rn_a + ii_b * rn_b * rn_b;
        self.inv_k = if k > Real::EPSILON { 1.0 / k } else { 0.0 };

        let constraint_error = dist - self.length;
        self.bias = self.damping * constraint_error * params.inv_dt();
    }

    pub(crate) fn solve_velocity(&mut self, _params: &IntegrationParameters, bodies: &mut RigidBodySet) {
        let Ok((a, b)) = bodies.get_pair_mut(self.body_a, self.body_b) else {
            return;
        };
        if self.inv_k <= 0.0 {
            return;
        }

        let v_rel = b.linear_velocity() + Vec2::cross_scalar_vec(b.angular_velocity(), self.r_b)
            - a.linear_velocity()
            - Vec2::cross_scalar_vec(a.angular_velocity(), self.r_a);
        let c_dot = v_rel.dot(self.normal);

        let delta = -(c_dot + self.bias) * self.inv_k;
        self.impulse += delta;

        let impulse_vec = self.normal * delta;
        let im_a = a.inverse_mass();
        let im_b = b.inverse_mass();
        let ii_a = a.inverse_inertia();
        let ii_b = b.inverse_inertia();

        a.apply_raw_velocity_delta(-impulse_vec * im_a, -ii_a * self.r_a.cross(impulse_vec));
        b.apply_raw_velocity_delta(impulse_vec * im_b, ii_b * self.r_b.cross(impulse_vec));
    }

    /// Distance joints stabilize purely through the velocity-level bias
    /// term (like contacts' Baumgarte bias); no separate NGS position
    /// pass is needed since the constraint is scalar and converges
    /// quickly under the damped bias.
    pub(crate) fn solve_position(&mut self, _bodies: &mut RigidBodySet) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::rigid_body::RigidBodyBuilder;
    use crate::geometry::Shape;
    use approx::assert_relative_eq;

    fn circle_body(bodies: &mut RigidBodySet, position: Vec2) -> RigidBodyHandle {
        let shape = Shape::circle(0.5).unwrap();
        let body = RigidBodyBuilder::new(shape).position(position).build().unwrap();
        bodies.insert(body)
    }

    #[test]
    fn at_rest_at_target_length_produces_zero_impulse() {
        let mut bodies = RigidBodySet::new();
        let a = circle_body(&mut bodies, Vec2::new(0.0, 0.0));
        let b = circle_body(&mut bodies, Vec2::new(2.0, 0.0));
        let mut joint = DistanceJoint::new(&bodies, a, b, Vec2::ZERO, Vec2::ZERO, 2.0).unwrap();

        let params = IntegrationParameters::default();
        joint.pre_solve(&params, &mut bodies);
        joint.solve_velocity(&params, &mut bodies);
        assert_relative_eq!(joint.impulse, 0.0, epsilon = 1.0e-5);
    }
}
