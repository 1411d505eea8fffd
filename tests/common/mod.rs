#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use workout_api::db::{create_memory_pool, DbPool};
use workout_api::graphql::create_schema;
use workout_api::handlers::graphql::GraphQLState;
use workout_api::migrations::run_migrations_for_tests;
use workout_api::models::{CreateUser, User};
use workout_api::repositories::UserRepository;
use workout_api::token::TokenService;

pub const TEST_SECRET: &str = "test_secret";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn test_tokens() -> TokenService {
    TokenService::new(TEST_SECRET, Duration::hours(1))
}

pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub tokens: TokenService,
}

pub fn create_test_app(pool: DbPool) -> TestApp {
    let tokens = test_tokens();
    let router = workout_api::routes::create_router(GraphQLState {
        schema: Arc::new(create_schema()),
        pool: pool.clone(),
        tokens: tokens.clone(),
    });

    TestApp {
        router,
        pool,
        tokens,
    }
}

impl TestApp {
    /// POST a GraphQL document and return the status with the decoded JSON body.
    pub async fn graphql_with_status(
        &self,
        query: &str,
        variables: Value,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let body = json!({ "query": query, "variables": variables });
        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub async fn graphql(&self, query: &str, variables: Value, token: Option<&str>) -> Value {
        let authorization = token.map(|t| format!("Bearer {}", t));
        let (status, body) = self
            .graphql_with_status(query, variables, authorization.as_deref())
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected status, body: {}", body);
        body
    }
}

/// `extensions.code` of the first error in a GraphQL response.
pub fn error_code(body: &Value) -> &str {
    body["errors"][0]["extensions"]["code"]
        .as_str()
        .unwrap_or_else(|| panic!("expected an error, got {}", body))
}

pub fn assert_no_errors(body: &Value) {
    assert!(body.get("errors").is_none(), "unexpected errors: {}", body);
}

pub async fn create_test_user(pool: &DbPool, email: &str, password: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(CreateUser {
            name: None,
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .unwrap()
}

pub async fn create_test_workout(pool: &DbPool, author_id: i32, title: &str) -> workout_api::models::Workout {
    let workout_repo = workout_api::repositories::WorkoutRepository::new(pool.clone());
    workout_repo.create(author_id, title).await.unwrap()
}
