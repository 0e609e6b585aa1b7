//! Storage primitives shared by the dynamics and geometry layers.

pub mod arena;
