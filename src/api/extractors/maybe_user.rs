use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use std::convert::Infallible;

pub struct MaybeUserContext(pub Option<String>);

impl<S> FromRequestParts<S> for MaybeUserContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(MaybeUserContext(user_id))
    }
}
