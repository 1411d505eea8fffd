use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::token::TokenService;

/// Who is making the request, as far as the `Authorization` header tells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// No `Authorization` header was sent.
    Anonymous,
    /// A token was sent and verified.
    User(i32),
    /// A token was sent but failed verification.
    Invalid,
}

impl Identity {
    /// Resolve the caller's user id.
    ///
    /// Anonymous callers resolve to `None`; a rejected token is an error so
    /// that an attempted but failed login is never mistaken for anonymity.
    pub fn user_id(&self) -> Result<Option<i32>, AppError> {
        match self {
            Identity::Anonymous => Ok(None),
            Identity::User(id) => Ok(Some(*id)),
            Identity::Invalid => Err(AppError::InvalidToken(
                jsonwebtoken::errors::ErrorKind::InvalidToken.into(),
            )),
        }
    }
}

/// Derive the identity from request headers.
///
/// Accepts both `Bearer <token>` and a bare token.
pub fn identify(headers: &HeaderMap, tokens: &TokenService) -> Identity {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Identity::Anonymous;
    };

    let Ok(value) = value.to_str() else {
        tracing::debug!("Authorization header is not valid UTF-8");
        return Identity::Invalid;
    };

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    match tokens.verify(token) {
        Ok(user_id) => {
            tracing::debug!("Authenticated user: {}", user_id);
            Identity::User(user_id)
        }
        Err(e) => {
            tracing::debug!("Token verification failed: {}", e);
            Identity::Invalid
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        Ok(identify(&parts.headers, &tokens))
    }
}
