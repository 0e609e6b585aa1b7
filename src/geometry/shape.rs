//! Convex shapes: circles and convex polygons.
//!
//! Shapes are pure local-space data. World-space vertices are always
//! derived on demand from `(shape, body transform)` — nothing here ever
//! caches a world-space vertex, per the narrowphase boundary rule in the
//! design notes.
//!
//! Both variants are expected to be authored with their centroid at the
//! local origin (the convenience constructors guarantee this); the body's
//! `Transform::position` then tracks the center of mass directly, avoiding
//! a parallel-axis correction in the inertia and solver math.

use crate::error::PhysicsError;
use crate::geometry::aabb::Aabb;
use crate::math::{Real, Transform, Vec2};

/// Number of vertices used to approximate a circle when a caller asks the
/// narrowphase to fall back to a polygonal SAT test against it, rather than
/// the analytic circle-vs-polygon path.
pub const CIRCLE_APPROXIMATION_VERTICES: usize = 16;

/// A convex shape attached to a rigid body.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: Real },
    Polygon { points: Vec<Vec2> },
}

impl Shape {
    /// Builds a circle of the given radius, centered at the body origin.
    pub fn circle(radius: Real) -> Result<Shape, PhysicsError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidArgument(format!(
                "circle radius must be finite and positive, got {radius}"
            )));
        }
        Ok(Shape::Circle { radius })
    }

    /// Builds a convex polygon from a counter-clockwise vertex ring. The
    /// ring is validated for size, convexity, and winding; it is NOT
    /// recentered, so callers should supply points around the origin.
    pub fn polygon(points: Vec<Vec2>) -> Result<Shape, PhysicsError> {
        if points.len() < 3 {
            return Err(PhysicsError::InvalidArgument(format!(
                "polygon needs at least 3 vertices, got {}",
                points.len()
            )));
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(PhysicsError::InvalidArgument(
                "polygon vertices must be finite".into(),
            ));
        }
        if !is_ccw(&points) {
            return Err(PhysicsError::InvalidArgument(
                "polygon vertices must be wound counter-clockwise".into(),
            ));
        }
        if !is_convex(&points) {
            return Err(PhysicsError::InvalidArgument(
                "polygon must be convex".into(),
            ));
        }
        Ok(Shape::Polygon { points })
    }

    /// A convenience constructor for an axis-aligned box centered at the
    /// origin, the 2D analogue of rapier's `SharedShape::cuboid`.
    pub fn box_shape(half_width: Real, half_height: Real) -> Result<Shape, PhysicsError> {
        Shape::polygon(vec![
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
            Vec2::new(-half_width, -half_height),
        ])
    }

    /// The shape's local vertex ring, usable by SAT. For circles this is
    /// the `CIRCLE_APPROXIMATION_VERTICES`-gon fallback only; the
    /// narrowphase prefers the analytic circle path and does not call this
    /// for circles in the common case.
    pub fn local_vertices(&self) -> Vec<Vec2> {
        match self {
            Shape::Polygon { points } => points.clone(),
            Shape::Circle { radius } => (0..CIRCLE_APPROXIMATION_VERTICES)
                .map(|i| {
                    let angle =
                        i as Real / CIRCLE_APPROXIMATION_VERTICES as Real * std::f64::consts::TAU as Real;
                    Vec2::new(angle.cos(), angle.sin()) * *radius
                })
                .collect(),
        }
    }

    /// World-space vertices for `pose`. Computed fresh every call.
    pub fn world_vertices(&self, pose: Transform) -> Vec<Vec2> {
        self.local_vertices()
            .into_iter()
            .map(|p| pose.apply(p))
            .collect()
    }

    /// Outward edge normals in local space, one per edge, for polygons.
    /// Empty for circles (SAT handles circles via the center-to-vertex
    /// axis instead, see `geometry::sat`).
    pub fn local_edge_normals(&self) -> Vec<Vec2> {
        match self {
            Shape::Circle { .. } => Vec::new(),
            Shape::Polygon { points } => {
                let n = points.len();
                (0..n)
                    .map(|i| {
                        let a = points[i];
                        let b = points[(i + 1) % n];
                        let edge = b - a;
                        Vec2::new(edge.y, -edge.x).normalized()
                    })
                    .collect()
            }
        }
    }

    /// Axis-aligned world bounding box of this shape posed at `pose`.
    pub fn aabb(&self, pose: Transform) -> Aabb {
        match self {
            Shape::Circle { radius } => {
                let center = pose.position;
                Aabb::new(
                    center - Vec2::new(*radius, *radius),
                    center + Vec2::new(*radius, *radius),
                )
            }
            Shape::Polygon { .. } => {
                let verts = self.world_vertices(pose);
                let mut lower = verts[0];
                let mut upper = verts[0];
                for v in &verts[1..] {
                    lower = lower.min(*v);
                    upper = upper.max(*v);
                }
                Aabb::new(lower, upper)
            }
        }
    }

    /// Moment of inertia about the centroid (which coincides with the
    /// local origin), for a body of the given total `mass`.
    pub fn inertia(&self, mass: Real) -> Real {
        match self {
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
            Shape::Polygon { points } => {
                // Standard polygon moment-of-inertia formula: sum the
                // contribution of each edge's triangle with the origin,
                // then scale by mass / area so the total mass matches.
                let mut area = 0.0 as Real;
                let mut inertia_numerator = 0.0 as Real;
                let n = points.len();
                for i in 0..n {
                    let p1 = points[i];
                    let p2 = points[(i + 1) % n];
                    let cross = p1.cross(p2);
                    area += 0.5 * cross;
                    let intx2 = p1.x * p1.x + p1.x * p2.x + p2.x * p2.x;
                    let inty2 = p1.y * p1.y + p1.y * p2.y + p2.y * p2.y;
                    inertia_numerator += (0.25 / 3.0) * cross * (intx2 + inty2);
                }
                if area.abs() < Real::EPSILON {
                    return 0.0;
                }
                let density = mass / area;
                (inertia_numerator * density).abs()
            }
        }
    }

    /// Polygon area, or the disc's area for a circle. Used to derive
    /// density-consistent inertia and, in tests, sanity-check shapes.
    pub fn area(&self) -> Real {
        match self {
            Shape::Circle { radius } => std::f64::consts::PI as Real * radius * radius,
            Shape::Polygon { points } => {
                let n = points.len();
                let mut area = 0.0 as Real;
                for i in 0..n {
                    area += points[i].cross(points[(i + 1) % n]);
                }
                (0.5 * area).abs()
            }
        }
    }
}

fn is_ccw(points: &[Vec2]) -> bool {
    let n = points.len();
    let mut signed_area = 0.0 as Real;
    for i in 0..n {
        signed_area += points[i].cross(points[(i + 1) % n]);
    }
    signed_area > 0.0
}

fn is_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = (b - a).cross(c - b);
        // A zero cross product (collinear edges) is tolerated; a sign flip
        // is not.
        if cross < -1.0e-7 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_degenerate_polygon() {
        assert!(Shape::polygon(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)]).is_err());
    }

    #[test]
    fn rejects_clockwise_winding() {
        let cw = vec![
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, -1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        assert!(Shape::polygon(cw).is_err());
    }

    #[test]
    fn rejects_nonconvex_polygon() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(Shape::polygon(points).is_err());
    }

    #[test]
    fn box_area_and_inertia_are_positive() {
        let b = Shape::box_shape(1.0, 2.0).unwrap();
        assert_relative_eq!(b.area(), 8.0, epsilon = 1.0e-5);
        assert!(b.inertia(4.0) > 0.0);
    }

    #[test]
    fn circle_aabb_is_centered() {
        let c = Shape::circle(2.0).unwrap();
        let aabb = c.aabb(Transform::new(Vec2::new(5.0, 5.0), 0.0));
        assert_relative_eq!(aabb.lower.x, 3.0, epsilon = 1.0e-6);
        assert_relative_eq!(aabb.upper.x, 7.0, epsilon = 1.0e-6);
    }
}
