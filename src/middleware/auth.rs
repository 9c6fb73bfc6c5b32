use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::Authorization;
use headers::authorization::Bearer;

use crate::error::OrreryError;
use crate::router::OrreryState;

/// Extractor guarding mutating routes: requires a valid bearer token on the
/// `Authorization` header. Rejection is always 401 with no detail about
/// whether the token was missing, malformed, or expired.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Email of the authenticated user (token subject).
    pub email: String,
}

impl FromRequestParts<OrreryState> for AuthUser {
    type Rejection = OrreryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &OrreryState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    OrreryError::Unauthorized("missing or malformed bearer token".to_string())
                })?;

        let claims = state.tokens.verify(bearer.token())?;
        Ok(Self { email: claims.sub })
    }
}
