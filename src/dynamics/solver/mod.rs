//! The sequential-impulse solver: contact and joint velocity constraints,
//! warm starting, and the per-island iteration loop (§4.4, §4.6).

pub mod contact_solver;
pub mod island_solver;

pub use island_solver::{solve_island_positions, solve_island_velocity};
