//! Exercise items group the exercises of a workout

pub mod model;
mod service;

pub use model::*;
pub use service::ExerciseItemService;
