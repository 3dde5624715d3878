use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

// Caller identity as asserted by the gateway. There is no session state
// in this service; every request carries the user explicitly.
pub struct UserContext(pub String);

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    // Rejecting through AppError keeps the 401 in the same error
    // envelope as every other response.
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-Id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Ok(UserContext(user_id.to_string()))
    }
}
