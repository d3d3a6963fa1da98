//! Exercises inside a workout

pub mod model;
mod service;

pub use model::*;
pub(crate) use service::EXERCISE_COLUMNS;
pub use service::ExerciseService;
