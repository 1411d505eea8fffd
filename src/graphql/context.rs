use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::repositories::{ExerciseRepository, UserRepository, WorkoutRepository};
use crate::token::TokenService;

/// Per-request GraphQL context: the caller's identity plus storage handles.
pub struct GraphQLContext {
    pub identity: Identity,
    pub user_repo: UserRepository,
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
    pub tokens: TokenService,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(pool: DbPool, tokens: TokenService, identity: Identity) -> Self {
        Self {
            identity,
            user_repo: UserRepository::new(pool.clone()),
            workout_repo: WorkoutRepository::new(pool.clone()),
            exercise_repo: ExerciseRepository::new(pool),
            tokens,
        }
    }

    /// The caller's user id, `None` when anonymous.
    pub fn caller(&self) -> Result<Option<i32>> {
        self.identity.user_id()
    }

    /// The caller's user id, failing when the request carries no identity.
    pub fn require_caller(&self) -> Result<i32> {
        self.caller()?
            .ok_or_else(|| AppError::Authorization("authentication required".to_string()))
    }
}
