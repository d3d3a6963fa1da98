//! Weight tracker backend library
//!
//! Personal fitness tracking API: accounts, workouts, exercises, sets and
//! statistics behind JWT authentication and a per-client rate limiter.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod exercise_items;
pub mod exercise_types;
pub mod exercises;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sets;
pub mod state;
pub mod statistics;
pub mod users;
pub mod workouts;
