use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use juniper::{graphql_value, FieldError, IntoFieldError, ScalarValue};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Invalid token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Authentication(String),

    #[error("Not authorised: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Password hash error")]
    PasswordHash,

    #[error("Token signing error: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Machine-readable code reported in `extensions.code` of GraphQL errors.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidToken(_) => "INVALID_TOKEN",
            AppError::Authentication(_) => "UNAUTHENTICATED",
            AppError::Authorization(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Internal(_)
            | AppError::PasswordHash
            | AppError::TokenSigning(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidToken(_) | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Internal(_)
            | AppError::PasswordHash
            | AppError::TokenSigning(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to API clients. Infrastructure failures are logged
    /// here and collapsed into a generic message.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
            AppError::PasswordHash => {
                tracing::error!("Password hash error");
                "Internal error".to_string()
            }
            AppError::TokenSigning(e) => {
                tracing::error!("Token signing error: {:?}", e);
                "Internal error".to_string()
            }
            AppError::InvalidToken(e) => {
                tracing::debug!("Rejected token: {}", e);
                self.to_string()
            }
            AppError::Authentication(msg) => msg.clone(),
            AppError::Authorization(_)
            | AppError::NotFound(_)
            | AppError::BadRequest(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}

impl<S: ScalarValue> IntoFieldError<S> for AppError {
    fn into_field_error(self) -> FieldError<S> {
        let code = self.code();
        FieldError::new(self.public_message(), graphql_value!({ "code": code }))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_for_auth_taxonomy() {
        assert_eq!(
            AppError::Authentication("Invalid password".into()).code(),
            "UNAUTHENTICATED"
        );
        assert_eq!(AppError::Authorization("x".into()).code(), "FORBIDDEN");
        assert_eq!(AppError::NotFound("x".into()).code(), "NOT_FOUND");
        assert_eq!(AppError::PasswordHash.code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let error = AppError::Internal("connection string leaked".into());
        assert_eq!(error.public_message(), "Internal error");
    }
}
