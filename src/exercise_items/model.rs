use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::exercises::Exercise;

/// How the exercises of an item are performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseItemType {
    /// Wraps a single exercise
    Exercise,
    Straight,
    Superset,
    Circuit,
}

impl ExerciseItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseItemType::Exercise => "exercise",
            ExerciseItemType::Straight => "straight",
            ExerciseItemType::Superset => "superset",
            ExerciseItemType::Circuit => "circuit",
        }
    }
}

impl fmt::Display for ExerciseItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exercise" => Ok(ExerciseItemType::Exercise),
            "straight" => Ok(ExerciseItemType::Straight),
            "superset" => Ok(ExerciseItemType::Superset),
            "circuit" => Ok(ExerciseItemType::Circuit),
            other => Err(format!("unknown exercise item type '{}'", other)),
        }
    }
}

/// Exercise item row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseItemRow {
    pub id: Uuid,
    pub item_type: String,
    pub workout_id: Uuid,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// An exercise item with the exercises it groups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub item_type: String,
    pub workout_id: Uuid,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
}

impl ExerciseItem {
    pub fn from_row(row: ExerciseItemRow, exercises: Vec<Exercise>) -> Self {
        Self {
            id: row.id,
            item_type: row.item_type,
            workout_id: row.workout_id,
            created_on: row.created_on,
            updated_on: row.updated_on,
            exercises,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExerciseItemRequest {
    #[serde(rename = "type")]
    pub item_type: ExerciseItemType,
}
