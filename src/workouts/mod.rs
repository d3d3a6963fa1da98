//! Workouts

pub mod model;
mod service;

pub use model::*;
pub use service::WorkoutService;
