// GraphQL schema, context and permission rules
pub mod context;
pub mod permissions;
pub mod schema;
pub mod types;

pub use context::GraphQLContext;
pub use permissions::{Field, Rule};
pub use schema::{create_schema, Schema};
pub use types::AuthPayload;
