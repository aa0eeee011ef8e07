use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::cookies::ACCESS_COOKIE;
use super::jwt::{Claims, JwtKeys};
use crate::error::ApiError;

/// Verified session extracted from the access token cookie. Handlers that
/// take this parameter reject unauthenticated requests before running.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .ok_or_else(|| {
                ApiError::Unauthorized("Access denied. No token provided.".into())
            })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(&token).map_err(|e| {
            warn!(error = %e, "access token verification failed");
            ApiError::Forbidden("Token verification failed. Access denied!".into())
        })?;

        Ok(AuthUser(claims))
    }
}
