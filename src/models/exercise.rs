use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i32,
    pub title: Option<String>,
    pub weight: f64,
    pub reps: i32,
    pub sets: i32,
    pub workout_id: i32,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            weight: row.get("weight")?,
            reps: row.get("reps")?,
            sets: row.get("sets")?,
            workout_id: row.get("workout_id")?,
        })
    }
}

#[derive(Debug)]
pub struct CreateExercise {
    pub workout_id: i32,
    pub title: Option<String>,
    pub weight: f64,
    pub reps: i32,
    pub sets: i32,
}
