//! 2D math primitives: vectors, 2x2 matrices, and rigid transforms.
//!
//! These are hand-rolled rather than pulled from `nalgebra`/`parry2d`: the
//! whole point of this layer is that the rest of the crate only ever needs
//! a 2-vector, a 2x2 matrix, and an affine transform, and keeping them local
//! keeps the dependency footprint honest about that.

use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// Scalar type used throughout the crate. `f32` by default; build with the
/// `f64` feature for double precision.
#[cfg(not(feature = "f64"))]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// A 2D vector (or point, the crate does not distinguish the two).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: Real,
    pub y: Real,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> Real {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D "cross product": the z-component of the 3D cross product of the
    /// two vectors embedded in the xy-plane. A scalar, not a vector.
    #[inline]
    pub fn cross(self, rhs: Vec2) -> Real {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Cross product of a scalar (angular velocity) and a vector, as used to
    /// turn `omega` into the linear velocity contribution `omega x r`.
    #[inline]
    pub fn cross_scalar_vec(s: Real, v: Vec2) -> Vec2 {
        Vec2::new(-s * v.y, s * v.x)
    }

    /// Cross product of a vector and a scalar: `v x s`, the mirror of
    /// [`Vec2::cross_scalar_vec`] used when deriving a tangent from a normal.
    #[inline]
    pub fn cross_vec_scalar(v: Vec2, s: Real) -> Vec2 {
        Vec2::new(s * v.y, -s * v.x)
    }

    #[inline]
    pub fn length_squared(self) -> Real {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> Real {
        self.length_squared().sqrt()
    }

    /// A unit vector in the same direction, or `ZERO` if `self` is (near)
    /// the zero vector. Never returns NaN.
    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len < Real::EPSILON {
            Vec2::ZERO
        } else {
            self / len
        }
    }

    /// This vector rotated counter-clockwise by `angle` radians.
    #[inline]
    pub fn rotated(self, angle: Real) -> Vec2 {
        let (s, c) = angle.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// The left-hand perpendicular (90 degree counter-clockwise rotation).
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    pub fn componentwise_mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }

    #[inline]
    pub fn clamp(self, lower: Vec2, upper: Vec2) -> Vec2 {
        Vec2::new(
            self.x.clamp(lower.x, upper.x),
            self.y.clamp(lower.y, upper.y),
        )
    }

    #[inline]
    pub fn min(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    #[inline]
    pub fn max(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<Real> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Real) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for Real {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl Div<Real> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: Real) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

/// A 2x2 real matrix, stored column-major (`col1`, `col2`) as rapier stores
/// its small dense matrices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mat22 {
    pub col1: Vec2,
    pub col2: Vec2,
}

impl Mat22 {
    #[inline]
    pub const fn new(col1: Vec2, col2: Vec2) -> Self {
        Self { col1, col2 }
    }

    /// The rotation matrix for `angle` radians.
    #[inline]
    pub fn from_angle(angle: Real) -> Self {
        let (s, c) = angle.sin_cos();
        Mat22::new(Vec2::new(c, s), Vec2::new(-s, c))
    }

    #[inline]
    pub fn from_rows(a11: Real, a12: Real, a21: Real, a22: Real) -> Self {
        Mat22::new(Vec2::new(a11, a21), Vec2::new(a12, a22))
    }

    #[inline]
    pub fn transpose(self) -> Mat22 {
        Mat22::from_rows(self.col1.x, self.col1.y, self.col2.x, self.col2.y)
    }

    #[inline]
    pub fn determinant(self) -> Real {
        self.col1.x * self.col2.y - self.col2.x * self.col1.y
    }

    /// Matrix inverse, or `None` if the matrix is (near) singular. Callers
    /// are expected to fall back to a diagonal approximation in that case,
    /// per the narrowphase/joint solvers below.
    #[inline]
    pub fn inverse(self) -> Option<Mat22> {
        let det = self.determinant();
        if det.abs() < 1.0e-9 {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Mat22::from_rows(
            inv_det * self.col2.y,
            -inv_det * self.col2.x,
            -inv_det * self.col1.y,
            inv_det * self.col1.x,
        ))
    }

    /// Solves `self * x = b` for `x`. Falls back to a diagonal
    /// approximation (`b / diag`) when the matrix is singular, per
    /// spec: callers must never receive NaN out of a joint solve.
    #[inline]
    pub fn solve(self, b: Vec2) -> Vec2 {
        match self.inverse() {
            Some(inv) => inv * b,
            None => {
                let d1 = if self.col1.x.abs() > 1.0e-9 {
                    self.col1.x
                } else {
                    1.0
                };
                let d2 = if self.col2.y.abs() > 1.0e-9 {
                    self.col2.y
                } else {
                    1.0
                };
                Vec2::new(b.x / d1, b.y / d2)
            }
        }
    }
}

impl Mul<Vec2> for Mat22 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(
            self.col1.x * rhs.x + self.col2.x * rhs.y,
            self.col1.y * rhs.x + self.col2.y * rhs.y,
        )
    }
}

impl Mul<Mat22> for Mat22 {
    type Output = Mat22;
    #[inline]
    fn mul(self, rhs: Mat22) -> Mat22 {
        Mat22::new(self * rhs.col1, self * rhs.col2)
    }
}

impl Add for Mat22 {
    type Output = Mat22;
    #[inline]
    fn add(self, rhs: Mat22) -> Mat22 {
        Mat22::new(self.col1 + rhs.col1, self.col2 + rhs.col2)
    }
}

impl Index<usize> for Vec2 {
    type Output = Real;
    #[inline]
    fn index(&self, i: usize) -> &Real {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2 index out of bounds: {i}"),
        }
    }
}

impl IndexMut<usize> for Vec2 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Real {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Vec2 index out of bounds: {i}"),
        }
    }
}

/// A rigid 2D transform: rotate then translate. Applied to local-space
/// points/vectors to get world-space ones.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: Real,
}

impl Transform {
    #[inline]
    pub const fn new(position: Vec2, rotation: Real) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    #[inline]
    pub fn rotation_matrix(self) -> Mat22 {
        Mat22::from_angle(self.rotation)
    }

    /// Applies this transform to a local-space point: rotate then translate.
    #[inline]
    pub fn apply(self, local_point: Vec2) -> Vec2 {
        self.rotation_matrix() * local_point + self.position
    }

    /// Applies only the rotational part, for direction vectors.
    #[inline]
    pub fn apply_vector(self, local_vector: Vec2) -> Vec2 {
        self.rotation_matrix() * local_vector
    }

    /// The inverse transform: `T.inverse().apply(T.apply(p)) == p`.
    #[inline]
    pub fn inverse(self) -> Transform {
        let inv_rotation = -self.rotation;
        let inv_rot_mat = Mat22::from_angle(inv_rotation);
        Transform::new(inv_rot_mat * (-self.position), inv_rotation)
    }

    /// Transforms a world-space point into this transform's local space.
    #[inline]
    pub fn inverse_apply(self, world_point: Vec2) -> Vec2 {
        self.rotation_matrix().transpose() * (world_point - self.position)
    }

    #[inline]
    pub fn inverse_apply_vector(self, world_vector: Vec2) -> Vec2 {
        self.rotation_matrix().transpose() * world_vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_length_normalizes_to_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn rotate_by_tau_is_identity() {
        let v = Vec2::new(1.0, 2.0);
        let r = v.rotated(std::f32::consts::TAU as Real);
        assert_relative_eq!(r.x, v.x, epsilon = 1.0e-4);
        assert_relative_eq!(r.y, v.y, epsilon = 1.0e-4);
    }

    #[test]
    fn mat22_solve_matches_inverse() {
        let m = Mat22::from_rows(2.0, 0.0, 0.0, 4.0);
        let b = Vec2::new(4.0, 8.0);
        let x = m.solve(b);
        assert_relative_eq!(x.x, 2.0, epsilon = 1.0e-6);
        assert_relative_eq!(x.y, 2.0, epsilon = 1.0e-6);
    }

    #[test]
    fn singular_matrix_falls_back_to_diagonal() {
        let m = Mat22::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        assert!(m.inverse().is_none());
        let x = m.solve(Vec2::new(2.0, 4.0));
        assert!(x.is_finite());
    }

    #[test]
    fn transform_round_trip() {
        let t = Transform::new(Vec2::new(3.0, -2.0), 0.7);
        let p = Vec2::new(5.0, 1.5);
        let round_tripped = t.inverse().apply(t.apply(p));
        assert_relative_eq!(round_tripped.x, p.x, epsilon = 1.0e-6);
        assert_relative_eq!(round_tripped.y, p.y, epsilon = 1.0e-6);
    }

    #[test]
    fn cross_product_matches_determinant() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert_relative_eq!(a.cross(b), 1.0, epsilon = 1.0e-6);
    }
}
