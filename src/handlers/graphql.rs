use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::{graphiql::graphiql_source, GraphQLRequest};

use crate::db::DbPool;
use crate::graphql::{GraphQLContext, Schema};
use crate::middleware::Identity;
use crate::token::TokenService;

#[derive(Clone)]
pub struct GraphQLState {
    pub schema: Arc<Schema>,
    pub pool: DbPool,
    pub tokens: TokenService,
}

impl FromRef<GraphQLState> for TokenService {
    fn from_ref(state: &GraphQLState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<GraphQLState> for DbPool {
    fn from_ref(state: &GraphQLState) -> Self {
        state.pool.clone()
    }
}

/// GraphQL POST endpoint
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    identity: Identity,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    let context = GraphQLContext::new(state.pool.clone(), state.tokens.clone(), identity);

    let response = request.execute(&state.schema, &context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// GraphiQL explorer
pub async fn graphiql() -> Html<String> {
    Html(graphiql_source("/graphql", None))
}
