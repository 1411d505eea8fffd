use rusqlite::{Connection, ErrorCode};

use crate::error::{AppError, Result};

pub mod exercise_repo;
pub mod user_repo;
pub mod workout_repo;

pub use exercise_repo::ExerciseRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;

/// Id of the row just inserted on `conn`. Ids are GraphQL `Int`, so a rowid
/// beyond `i32::MAX` is an error rather than a wrapped value.
fn inserted_id(conn: &Connection) -> Result<i32> {
    let rowid = conn.last_insert_rowid();
    i32::try_from(rowid).map_err(|_| AppError::Internal(format!("rowid {} exceeds i32", rowid)))
}

/// UNIQUE, FOREIGN KEY, NOT NULL and CHECK failures all report as constraint violations.
fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
