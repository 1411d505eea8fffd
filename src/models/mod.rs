use rusqlite::Row;

pub mod exercise;
pub mod user;
pub mod workout;

pub use exercise::{CreateExercise, Exercise};
pub use user::{CreateUser, LoginCredentials, User};
pub use workout::Workout;

/// Build a model from a `SELECT *` row of its table.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
