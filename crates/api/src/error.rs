use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use studio_core::record::ValidationError;
use studio_core::ContentError;

/// API error type rendered as `{ "error": { type, message, statusCode } }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(v) => v.into(),
            ContentError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ContentError::Repository(_) | ContentError::Asset(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::asset::AssetError;
    use studio_core::record::ContentKind;

    #[test]
    fn content_errors_map_to_statuses() {
        let cases = [
            (
                ContentError::from(ValidationError::InvalidKind("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ContentError::not_found(ContentKind::Video, "abc"),
                StatusCode::NOT_FOUND,
            ),
            (
                ContentError::from(AssetError::Io {
                    name: "/srv/uploads/1-a.png".into(),
                    source: std::io::Error::other("disk full"),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn internal_details_stay_out_of_message() {
        let err = ApiError::from(ContentError::from(AssetError::Io {
            name: "/srv/uploads/1-a.png".into(),
            source: std::io::Error::other("disk full"),
        }));
        let ApiError::Internal(detail) = &err else {
            panic!("expected internal error");
        };
        assert!(detail.contains("/srv/uploads"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
