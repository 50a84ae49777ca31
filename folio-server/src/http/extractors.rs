//! Custom Axum extractors
//!
//! Wrap the stock extractors so every decoding failure comes back as a
//! 422 with a `detail` body instead of axum's plain-text rejections.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body that rejects with `ApiError`
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::malformed("body", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string that rejects with `ApiError`
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::malformed("query", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Extract an integer contact id from path
pub struct ContactId(pub i64);

impl<S> FromRequestParts<S> for ContactId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::malformed("id", rejection.body_text()))?;

        let id = raw
            .parse::<i64>()
            .map_err(|_| ApiError::malformed("id", format!("`{}` is not a valid integer", raw)))?;

        Ok(Self(id))
    }
}
