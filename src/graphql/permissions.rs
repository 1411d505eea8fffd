//! Field-level permission rules.
//!
//! Every root field of the schema has exactly one [`Rule`], looked up through
//! [`Field::rule`]. Resolvers call [`guard`] before touching storage, so a
//! denied field never produces side effects.

use super::context::GraphQLContext;
use crate::error::{AppError, Result};

/// Root query and mutation fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AllUsers,
    Me,
    WorkoutById,
    Signup,
    Login,
    CreateWorkout,
    DeleteWorkout,
    TogglePublishWorkout,
    IncrementWorkoutViewCount,
    CreateExercise,
    DeleteExercise,
}

/// Authorization predicate for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Anyone, without consulting identity.
    Allow,
    /// Anonymous callers get a null result; a rejected token is still an error.
    RedactAnonymous,
    /// A verified token is required.
    Authenticated,
    /// A verified token whose user authored the target workout.
    WorkoutAuthor,
}

impl Field {
    pub const QUERIES: &'static [Field] = &[Field::AllUsers, Field::Me, Field::WorkoutById];

    pub const MUTATIONS: &'static [Field] = &[
        Field::Signup,
        Field::Login,
        Field::CreateWorkout,
        Field::DeleteWorkout,
        Field::TogglePublishWorkout,
        Field::IncrementWorkoutViewCount,
        Field::CreateExercise,
        Field::DeleteExercise,
    ];

    /// Name of the field in the GraphQL schema.
    pub fn name(self) -> &'static str {
        match self {
            Field::AllUsers => "allUsers",
            Field::Me => "me",
            Field::WorkoutById => "workoutById",
            Field::Signup => "signup",
            Field::Login => "login",
            Field::CreateWorkout => "createWorkout",
            Field::DeleteWorkout => "deleteWorkout",
            Field::TogglePublishWorkout => "togglePublishWorkout",
            Field::IncrementWorkoutViewCount => "incrementWorkoutViewCount",
            Field::CreateExercise => "createExercise",
            Field::DeleteExercise => "deleteExercise",
        }
    }

    pub fn rule(self) -> Rule {
        match self {
            Field::AllUsers => Rule::Allow,
            Field::Me => Rule::RedactAnonymous,
            Field::WorkoutById => Rule::Allow,
            Field::Signup => Rule::Allow,
            Field::Login => Rule::Allow,
            Field::CreateWorkout => Rule::Authenticated,
            Field::DeleteWorkout => Rule::WorkoutAuthor,
            Field::TogglePublishWorkout => Rule::WorkoutAuthor,
            Field::IncrementWorkoutViewCount => Rule::Allow,
            Field::CreateExercise => Rule::Authenticated,
            Field::DeleteExercise => Rule::Authenticated,
        }
    }
}

/// The resource a rule is checked against, when it needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    None,
    Workout(i32),
}

/// Evaluate the rule for `field`.
///
/// Returns the caller's user id when the rule resolved one. Only
/// [`Rule::RedactAnonymous`] and [`Rule::Allow`] can succeed with `None`.
pub async fn guard(ctx: &GraphQLContext, field: Field, target: Target) -> Result<Option<i32>> {
    let rule = field.rule();
    let decision = evaluate(ctx, field, rule, target).await;

    if let Err(e) = &decision {
        tracing::debug!(field = field.name(), ?rule, "Permission denied: {}", e);
    }

    decision
}

async fn evaluate(
    ctx: &GraphQLContext,
    field: Field,
    rule: Rule,
    target: Target,
) -> Result<Option<i32>> {
    match rule {
        Rule::Allow => Ok(None),
        Rule::RedactAnonymous => ctx.caller(),
        Rule::Authenticated => ctx.require_caller().map(Some),
        Rule::WorkoutAuthor => {
            let caller = ctx.require_caller()?;
            let Target::Workout(workout_id) = target else {
                return Err(AppError::Internal(format!(
                    "{} is guarded by workout author but has no workout target",
                    field.name()
                )));
            };
            let workout = ctx
                .workout_repo
                .find_by_id(workout_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", workout_id)))?;

            if !workout.is_authored_by(caller) {
                return Err(AppError::Authorization(format!(
                    "only the author may {} workout {}",
                    field.name(),
                    workout_id
                )));
            }
            Ok(Some(caller))
        }
    }
}
