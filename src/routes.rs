use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{graphql, health};

pub fn create_router(graphql_state: graphql::GraphQLState) -> Router {
    Router::new()
        .route(
            "/graphql",
            get(graphql::graphiql).post(graphql::graphql_handler),
        )
        .route("/health", get(health::health_check))
        .with_state(graphql_state)
        .layer(TraceLayer::new_for_http())
}
