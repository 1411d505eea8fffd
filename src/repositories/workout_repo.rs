use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, Workout};

use super::inserted_id;

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: i32, title: &str) -> Result<Workout> {
        let pool = self.pool.clone();
        let title = title.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workouts (created_at, updated_at, title, published, view_count, author_id)
                 VALUES (?, ?, ?, 0, 0, ?)",
                rusqlite::params![now, now, title, author_id],
            )?;
            Ok(Workout {
                id: inserted_id(&conn)?,
                created_at: now,
                updated_at: now,
                title,
                published: false,
                view_count: 0,
                author_id: Some(author_id),
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_author(&self, author_id: i32) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT * FROM workouts WHERE author_id = ? ORDER BY created_at DESC, id DESC")?;
            let workouts = stmt
                .query_map([author_id], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Flip the published flag. Returns `None` if the workout does not exist.
    pub async fn toggle_published(&self, id: i32) -> Result<Option<Workout>> {
        self.update_returning(
            id,
            "UPDATE workouts SET published = NOT published, updated_at = ? WHERE id = ?",
        )
        .await
    }

    /// Bump the view counter. Returns `None` if the workout does not exist.
    pub async fn increment_view_count(&self, id: i32) -> Result<Option<Workout>> {
        self.update_returning(
            id,
            "UPDATE workouts SET view_count = view_count + 1, updated_at = ? WHERE id = ?",
        )
        .await
    }

    async fn update_returning(&self, id: i32, sql: &'static str) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(sql, rusqlite::params![now, id])?;
            if rows == 0 {
                return Ok(None);
            }
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete the workout and its exercises. Returns the deleted row, or
    /// `None` if nothing matched.
    pub async fn delete(&self, id: i32) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let Some(workout) = stmt.query_row([id], Workout::from_row).optional()? else {
                return Ok(None);
            };
            conn.execute("DELETE FROM workouts WHERE id = ?", [id])?;
            Ok(Some(workout))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
