//! Exercise types and personal records

pub mod model;
mod service;

pub use model::*;
pub use service::ExerciseTypeService;
