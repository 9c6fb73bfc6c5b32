use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::OrreryError;

/// JSON body extractor that reports malformed input as a validation error.
///
/// A non-numeric `mass` or a missing required field becomes a 400 with the
/// deserializer's message, never an unhandled rejection.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = OrreryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(OrreryError::Validation(rejection.body_text())),
        }
    }
}
