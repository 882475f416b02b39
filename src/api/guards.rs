use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::errors::ApiError;

const STUDENT_HEADER: &str = "x-student-id";

/// Caller identity forwarded by the gateway that fronts this service. The
/// gateway authenticates; this service only needs a stable student id.
pub(crate) struct Student(pub(crate) String);

#[async_trait]
impl<S> FromRequestParts<S> for Student
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let student_id = parts
            .headers
            .get(STUDENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::Unauthorized("Missing student identity"))?;

        Ok(Student(student_id.to_string()))
    }
}
