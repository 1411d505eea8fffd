use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateExercise, Exercise, FromSqliteRow};

use super::{inserted_id, is_constraint_violation};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_workout(&self, workout_id: i32) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE workout_id = ? ORDER BY id")?;
            let exercises = stmt
                .query_map([workout_id], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Insert an exercise under an existing workout.
    ///
    /// The foreign key on `workout_id` is the existence check, so a workout
    /// deleted concurrently is reported as not found.
    pub async fn create(&self, input: CreateExercise) -> Result<Exercise> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (title, weight, reps, sets, workout_id) VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![
                    input.title,
                    input.weight,
                    input.reps,
                    input.sets,
                    input.workout_id
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    AppError::NotFound(format!("Workout {} not found", input.workout_id))
                } else {
                    AppError::Database(e)
                }
            })?;
            Ok(Exercise {
                id: inserted_id(&conn)?,
                title: input.title,
                weight: input.weight,
                reps: input.reps,
                sets: input.sets,
                workout_id: input.workout_id,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete an exercise, returning the removed row or `None` if nothing matched.
    pub async fn delete(&self, id: i32) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let Some(exercise) = stmt.query_row([id], Exercise::from_row).optional()? else {
                return Ok(None);
            };
            conn.execute("DELETE FROM exercises WHERE id = ?", [id])?;
            Ok(Some(exercise))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::repositories::WorkoutRepository;

    fn squat(workout_id: i32) -> CreateExercise {
        CreateExercise {
            workout_id,
            title: Some("Squat".to_string()),
            weight: 100.0,
            reps: 5,
            sets: 5,
        }
    }

    #[tokio::test]
    async fn test_create_under_missing_workout_is_not_found() {
        let pool = create_memory_pool().unwrap();
        run_migrations_for_tests(&pool).unwrap();
        let repo = ExerciseRepository::new(pool);

        let result = repo.create(squat(42)).await;
        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Workout 42 not found"));
    }

    #[tokio::test]
    async fn test_create_after_workout_deleted_is_not_found() {
        let pool = create_memory_pool().unwrap();
        run_migrations_for_tests(&pool).unwrap();
        pool.get()
            .unwrap()
            .execute(
                "INSERT INTO users (email, password_hash) VALUES ('a@example.com', 'x')",
                [],
            )
            .unwrap();
        let workouts = WorkoutRepository::new(pool.clone());
        let exercises = ExerciseRepository::new(pool);

        let workout = workouts.create(1, "Legs").await.unwrap();
        let first = exercises.create(squat(workout.id)).await.unwrap();
        assert_eq!(first.workout_id, workout.id);

        workouts.delete(workout.id).await.unwrap();
        assert!(matches!(
            exercises.create(squat(workout.id)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(exercises.find_by_workout(workout.id).await.unwrap().is_empty());
    }
}
