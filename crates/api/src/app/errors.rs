use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use rolegate_admin::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::InvalidInput(msg) => {
            tracing::warn!(reason = %msg, "request rejected");
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        ServiceError::NotFound(msg) => {
            tracing::warn!(reason = %msg, "record not found");
            json_error(StatusCode::NOT_FOUND, "not_found", msg)
        }
        ServiceError::Unexpected { message, details } => {
            tracing::error!(%details, "request failed unexpectedly");
            json_error_with_details(
                StatusCode::INTERNAL_SERVER_ERROR,
                "unexpected",
                message,
                details,
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_error_with_details(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    details: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "details": details.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use rolegate_admin::UNEXPECTED_MESSAGE;
    use serde_json::Value;

    use super::*;

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unexpected_errors_are_500_with_details() {
        let res = service_error_to_response(ServiceError::unexpected("connection reset"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            json!({
                "error": "unexpected",
                "message": UNEXPECTED_MESSAGE,
                "details": "connection reset",
            })
        );
    }

    #[tokio::test]
    async fn client_errors_carry_no_details() {
        let res = service_error_to_response(ServiceError::not_found("Role not found."));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            json!({"error": "not_found", "message": "Role not found."})
        );

        let res = service_error_to_response(ServiceError::invalid_input("Invalid Role ID."));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "invalid_input");
    }
}
