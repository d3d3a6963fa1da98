use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Periods, Statistics};
use crate::error::ApiError;

#[derive(Clone)]
pub struct StatisticsService {
    db_pool: PgPool,
}

impl StatisticsService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Count the user's completed workouts per period
    pub async fn get(&self, user_id: Uuid) -> Result<Statistics, ApiError> {
        let periods = Periods::containing(Utc::now());

        let statistics = sqlx::query_as::<_, Statistics>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE completed_on >= $2) AS week,
                COUNT(*) FILTER (WHERE completed_on >= $3 AND completed_on < $2) AS previous_week,
                COUNT(*) FILTER (WHERE completed_on >= $4) AS month,
                COUNT(*) FILTER (WHERE completed_on >= $5 AND completed_on < $4) AS previous_month,
                COUNT(*) FILTER (WHERE completed_on >= $6) AS year,
                COUNT(*) FILTER (WHERE completed_on >= $7 AND completed_on < $6) AS previous_year
            FROM workouts
            WHERE user_id = $1 AND completed_on IS NOT NULL
            "#,
        )
        .bind(user_id)
        .bind(periods.week_start)
        .bind(periods.previous_week_start)
        .bind(periods.month_start)
        .bind(periods.previous_month_start)
        .bind(periods.year_start)
        .bind(periods.previous_year_start)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(statistics)
    }
}
