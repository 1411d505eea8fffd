use chrono::{DateTime, Utc};
use juniper::graphql_object;

use super::context::GraphQLContext;
use crate::error::{AppError, Result};
use crate::models::{Exercise, User, Workout};

#[graphql_object(context = GraphQLContext)]
impl User {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn email(&self) -> &str {
        &self.email
    }

    async fn workouts(&self, ctx: &GraphQLContext) -> Result<Vec<Workout>> {
        ctx.workout_repo.find_by_author(self.id).await
    }
}

#[graphql_object(context = GraphQLContext)]
impl Workout {
    fn id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn published(&self) -> bool {
        self.published
    }

    fn view_count(&self) -> i32 {
        self.view_count
    }

    async fn author(&self, ctx: &GraphQLContext) -> Result<Option<User>> {
        match self.author_id {
            Some(author_id) => ctx.user_repo.find_by_id(author_id).await,
            None => Ok(None),
        }
    }

    async fn exercises(&self, ctx: &GraphQLContext) -> Result<Vec<Exercise>> {
        ctx.exercise_repo.find_by_workout(self.id).await
    }
}

#[graphql_object(context = GraphQLContext)]
impl Exercise {
    fn id(&self) -> i32 {
        self.id
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn reps(&self) -> i32 {
        self.reps
    }

    fn sets(&self) -> i32 {
        self.sets
    }

    /// The parent workout. Exercises cannot outlive it.
    async fn workout(&self, ctx: &GraphQLContext) -> Result<Workout> {
        ctx.workout_repo
            .find_by_id(self.workout_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", self.workout_id)))
    }
}

/// Returned by `signup` and `login`.
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[graphql_object(context = GraphQLContext)]
impl AuthPayload {
    fn token(&self) -> &str {
        &self.token
    }

    fn user(&self) -> User {
        self.user.clone()
    }
}
