//! HTTP handlers
//!
//! Handlers parse the request, call one service method and shape the JSON
//! response. Identity comes from the [`AuthenticatedUser`](crate::middleware::AuthenticatedUser)
//! extractor on protected routes.

pub mod auth;
pub mod exercise_items;
pub mod exercise_types;
pub mod exercises;
pub mod health;
pub mod sets;
pub mod statistics;
pub mod users;
pub mod workouts;
