use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use axum_macros::debug_handler;
use lettre::AsyncTransport;

use std::sync::Arc;

use crate::dto::{EmailRequest, ErrorResponse};
use crate::service::Mailer;

pub fn router<T>(mailer: Arc<Mailer<T>>) -> Router
where
    T: AsyncTransport + Send + Sync + 'static,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    Router::new()
        .route("/send-email", any(send_email::<T>))
        .route("/", get(health_check))
        .with_state(mailer)
}

/// Single relay endpoint. All methods land here so the method gate can answer
/// with the endpoint's own JSON error body instead of a bare 405.
pub async fn send_email<T>(
    State(mailer): State<Arc<Mailer<T>>>,
    method: Method,
    body: Bytes,
) -> Response
where
    T: AsyncTransport + Send + Sync + 'static,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    // Browsers send a preflight before the cross-origin POST
    if method == Method::OPTIONS {
        return with_relay_headers(StatusCode::OK.into_response());
    }

    if method != Method::POST {
        return error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Only POST method is supported".to_string(),
        );
    }

    // A bare JSON null decodes the same as an empty object
    let request = match serde_json::from_slice::<Option<EmailRequest>>(&body) {
        Ok(parsed) => parsed.unwrap_or_default(),
        Err(_) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON format".to_string());
        }
    };

    // Empty-string check only, no trimming
    if request.to.is_empty() || request.message.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Fields 'to' and 'message' are required".to_string(),
        );
    }

    match mailer.send(request).await {
        Ok(r) => with_relay_headers((StatusCode::OK, Json(r)).into_response()),
        Err(e) => {
            tracing::error!("Failed to send email: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to send email: {e}"),
            )
        }
    }
}

#[debug_handler]
pub async fn health_check() -> Response {
    (StatusCode::OK, "Hello from mail relay!").into_response()
}

fn error_response(status: StatusCode, error: String) -> Response {
    with_relay_headers((status, Json(ErrorResponse { error })).into_response())
}

fn with_relay_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
