//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::{AuthService, TokenService};
use crate::config::Config;
use crate::exercise_items::ExerciseItemService;
use crate::exercise_types::ExerciseTypeService;
use crate::exercises::ExerciseService;
use crate::sets::SetService;
use crate::statistics::StatisticsService;
use crate::users::{Mailer, UserService};
use crate::workouts::WorkoutService;

/// Settings read by the operational endpoints
#[derive(Clone)]
pub struct OpsSettings {
    pub api_key: Option<String>,
    pub client_header: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub tokens: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub workout_service: Arc<WorkoutService>,
    pub exercise_type_service: Arc<ExerciseTypeService>,
    pub exercise_item_service: Arc<ExerciseItemService>,
    pub exercise_service: Arc<ExerciseService>,
    pub set_service: Arc<SetService>,
    pub statistics_service: Arc<StatisticsService>,
    pub ops: OpsSettings,
}

impl AppState {
    /// Wire every service on top of one pool
    pub fn new(db_pool: PgPool, config: &Config, mailer: Arc<dyn Mailer>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt));

        Self {
            auth_service: Arc::new(AuthService::new(db_pool.clone(), tokens.clone())),
            user_service: Arc::new(UserService::new(
                db_pool.clone(),
                tokens.clone(),
                mailer,
                config.base_url.clone(),
            )),
            workout_service: Arc::new(WorkoutService::new(db_pool.clone())),
            exercise_type_service: Arc::new(ExerciseTypeService::new(db_pool.clone())),
            exercise_item_service: Arc::new(ExerciseItemService::new(db_pool.clone())),
            exercise_service: Arc::new(ExerciseService::new(db_pool.clone())),
            set_service: Arc::new(SetService::new(db_pool.clone())),
            statistics_service: Arc::new(StatisticsService::new(db_pool.clone())),
            ops: OpsSettings {
                api_key: config.api_key.clone(),
                client_header: config.rate_limit.client_header.clone(),
            },
            tokens,
            db_pool,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<UserService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.user_service.clone()
    }
}

impl FromRef<AppState> for Arc<WorkoutService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.workout_service.clone()
    }
}

impl FromRef<AppState> for Arc<ExerciseTypeService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.exercise_type_service.clone()
    }
}

impl FromRef<AppState> for Arc<ExerciseItemService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.exercise_item_service.clone()
    }
}

impl FromRef<AppState> for Arc<ExerciseService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.exercise_service.clone()
    }
}

impl FromRef<AppState> for Arc<SetService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.set_service.clone()
    }
}

impl FromRef<AppState> for Arc<StatisticsService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.statistics_service.clone()
    }
}

impl FromRef<AppState> for OpsSettings {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ops.clone()
    }
}
