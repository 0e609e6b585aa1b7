//! Orchestrates one fixed timestep end-to-end. `World` owns all state;
//! `PhysicsPipeline` is the stateless sequence of stages from §4.7,
//! kept as its own type (rather than inlined into `World::step`) so the
//! stage order is visible in one place.

pub mod physics_pipeline;

pub use physics_pipeline::PhysicsPipeline;
