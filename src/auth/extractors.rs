use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{claims::Identity, cookie::token_from_headers, jwt::SessionKeys};
use crate::error::AppError;

/// Validates the session token and yields the caller identity.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from_headers(&parts.headers) else {
            warn!("request without session token");
            return Err(AppError::Authentication("Authentication required".into()));
        };

        let keys = SessionKeys::from_ref(state);
        let identity = keys.verify(&token)?;
        Ok(AuthUser(identity))
    }
}
