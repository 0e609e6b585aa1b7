//! `impulse2d` — a 2D rigid-body physics core: broadphase pair
//! generation, SAT narrowphase, a warm-started sequential-impulse
//! solver with Baumgarte stabilization, revolute/distance joints, and
//! island-based solving.
//!
//! This crate is the stepping pipeline only. Visualization, scene
//! scripting, SVG export, and benchmarking harnesses are external
//! collaborators that consume this crate's read-only debug interface
//! (see [`World::bodies`], [`World::joints`], [`World::contacts`]).
//!
//! # Example
//!
//! ```
//! use impulse2d::dynamics::{IntegrationParameters, RigidBodyBuilder};
//! use impulse2d::geometry::Shape;
//! use impulse2d::math::Vec2;
//! use impulse2d::world::World;
//!
//! let mut world = World::new(Vec2::new(0.0, -9.81), IntegrationParameters::default()).unwrap();
//!
//! let ground = Shape::box_shape(10.0, 1.0).unwrap();
//! world.add_body(
//!     RigidBodyBuilder::new(ground)
//!         .fixed()
//!         .position(Vec2::new(0.0, -1.0))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let ball = Shape::circle(0.5).unwrap();
//! let handle = world.add_body(
//!     RigidBodyBuilder::new(ball)
//!         .position(Vec2::new(0.0, 5.0))
//!         .build()
//!         .unwrap(),
//! );
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0).unwrap();
//! }
//! assert!(world.body(handle).unwrap().translation().y < 5.0);
//! ```

pub mod data;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod world;

pub use error::{PhysicsError, PhysicsResult};
pub use world::World;
