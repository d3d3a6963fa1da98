//! Sets logged against an exercise

pub mod model;
mod service;

pub use model::*;
pub use service::SetService;
