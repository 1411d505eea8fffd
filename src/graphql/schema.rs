//! GraphQL schema definition.
//!
//! Every root resolver starts with [`guard`] for its [`Field`] and only then
//! reads or writes storage.

use juniper::{graphql_object, EmptySubscription, RootNode};
use tracing::info;

use super::context::GraphQLContext;
use super::permissions::{guard, Field, Target};
use super::types::AuthPayload;
use crate::error::{AppError, Result};
use crate::models::{CreateExercise, CreateUser, Exercise, LoginCredentials, User, Workout};

pub struct Query;

#[graphql_object(context = GraphQLContext)]
impl Query {
    async fn all_users(ctx: &GraphQLContext) -> Result<Vec<User>> {
        guard(ctx, Field::AllUsers, Target::None).await?;
        ctx.user_repo.find_all().await
    }

    /// The calling user, or null for anonymous requests.
    async fn me(ctx: &GraphQLContext) -> Result<Option<User>> {
        let Some(user_id) = guard(ctx, Field::Me, Target::None).await? else {
            return Ok(None);
        };
        ctx.user_repo.find_by_id(user_id).await
    }

    async fn workout_by_id(ctx: &GraphQLContext, id: i32) -> Result<Option<Workout>> {
        guard(ctx, Field::WorkoutById, Target::None).await?;
        ctx.workout_repo.find_by_id(id).await
    }
}

pub struct Mutation;

#[graphql_object(context = GraphQLContext)]
impl Mutation {
    async fn signup(
        ctx: &GraphQLContext,
        name: Option<String>,
        email: String,
        password: String,
    ) -> Result<AuthPayload> {
        guard(ctx, Field::Signup, Target::None).await?;

        let user = ctx
            .user_repo
            .create(CreateUser {
                name,
                email,
                password,
            })
            .await?;
        let token = ctx.tokens.issue(user.id)?;

        info!("User {} signed up", user.id);
        Ok(AuthPayload { token, user })
    }

    async fn login(ctx: &GraphQLContext, email: String, password: String) -> Result<AuthPayload> {
        guard(ctx, Field::Login, Target::None).await?;

        let user = ctx
            .user_repo
            .verify_credentials(&LoginCredentials { email, password })
            .await?;
        let token = ctx.tokens.issue(user.id)?;

        info!("User {} logged in", user.id);
        Ok(AuthPayload { token, user })
    }

    async fn create_workout(ctx: &GraphQLContext, title: String) -> Result<Workout> {
        guard(ctx, Field::CreateWorkout, Target::None).await?;
        let author_id = ctx.require_caller()?;
        ctx.workout_repo.create(author_id, &title).await
    }

    async fn delete_workout(ctx: &GraphQLContext, id: i32) -> Result<Workout> {
        guard(ctx, Field::DeleteWorkout, Target::Workout(id)).await?;

        let workout = ctx
            .workout_repo
            .delete(id)
            .await?
            .ok_or_else(|| workout_not_found(id))?;

        info!("Deleted workout {}", id);
        Ok(workout)
    }

    async fn toggle_publish_workout(ctx: &GraphQLContext, id: i32) -> Result<Workout> {
        guard(ctx, Field::TogglePublishWorkout, Target::Workout(id)).await?;
        ctx.workout_repo
            .toggle_published(id)
            .await?
            .ok_or_else(|| workout_not_found(id))
    }

    async fn increment_workout_view_count(ctx: &GraphQLContext, id: i32) -> Result<Workout> {
        guard(ctx, Field::IncrementWorkoutViewCount, Target::None).await?;
        ctx.workout_repo
            .increment_view_count(id)
            .await?
            .ok_or_else(|| workout_not_found(id))
    }

    /// Attach an exercise to the workout identified by `id`.
    async fn create_exercise(
        ctx: &GraphQLContext,
        id: i32,
        title: Option<String>,
        weight: f64,
        reps: i32,
        sets: i32,
    ) -> Result<Exercise> {
        guard(ctx, Field::CreateExercise, Target::None).await?;
        ctx.exercise_repo
            .create(CreateExercise {
                workout_id: id,
                title,
                weight,
                reps,
                sets,
            })
            .await
    }

    async fn delete_exercise(ctx: &GraphQLContext, id: i32) -> Result<Exercise> {
        guard(ctx, Field::DeleteExercise, Target::None).await?;
        ctx.exercise_repo
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exercise {} not found", id)))
    }
}

fn workout_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Workout {} not found", id))
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
