use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub published: bool,
    pub view_count: i32,
    pub author_id: Option<i32>,
}

impl Workout {
    pub fn is_authored_by(&self, user_id: i32) -> bool {
        self.author_id == Some(user_id)
    }
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            title: row.get("title")?,
            published: row.get("published")?,
            view_count: row.get("view_count")?,
            author_id: row.get("author_id")?,
        })
    }
}
