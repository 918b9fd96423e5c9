//! Method override for HTML forms.
//!
//! Browsers only submit forms as GET or POST. A POST carrying `_method` in
//! its query string or in its url-encoded body is re-dispatched as that
//! method. Only DELETE, PATCH and PUT are honoured.
//!
//! This must run before routing, so it is layered around the fully built
//! router rather than added with `Router::layer` on the task routes.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, warn};

pub const METHOD_FIELD: &str = "_method";

/// Largest form body buffered while looking for the override field. Matches
/// axum's default request body limit, so any form a handler would accept
/// gets through.
pub const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

pub async fn method_override(req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();

    if let Some(method) = parts.uri.query().and_then(|q| find_override(q.as_bytes())) {
        debug!(%method, "method overridden from query string");
        parts.method = method;
        return next.run(Request::from_parts(parts, body)).await;
    }

    if !is_form(&parts.headers) {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let bytes = match Limited::new(body, MAX_FORM_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            warn!(limit = MAX_FORM_BYTES, "form body too large");
            return (StatusCode::PAYLOAD_TOO_LARGE, "form body too large").into_response();
        }
        Err(e) => {
            warn!(error = %e, "could not read form body");
            return (StatusCode::BAD_REQUEST, "could not read form body").into_response();
        }
    };

    if let Some(method) = find_override(&bytes) {
        debug!(%method, "method overridden from form field");
        parts.method = method;
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// The first `_method` pair in url-encoded `input`, if it names a supported
/// method.
fn find_override(input: &[u8]) -> Option<Method> {
    let (_, value) = url::form_urlencoded::parse(input).find(|(key, _)| key == METHOD_FIELD)?;
    match value.trim().to_ascii_uppercase().as_str() {
        "DELETE" => Some(Method::DELETE),
        "PATCH" => Some(Method::PATCH),
        "PUT" => Some(Method::PUT),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::Router;
    use axum::routing::any;
    use tower::ServiceExt;

    fn echo_method_app() -> Router {
        let inner = Router::new().route(
            "/tasks/{id}",
            any(|method: Method, body: String| async move { format!("{method} {body}") }),
        );
        Router::new()
            .fallback_service(inner)
            .layer(axum::middleware::from_fn(method_override))
    }

    async fn send(req: Request) -> String {
        let response = echo_method_app().oneshot(req).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: impl Into<Body>) -> Request {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.into())
            .unwrap()
    }

    #[test]
    fn only_supported_methods_are_found() {
        assert_eq!(find_override(b"_method=delete"), Some(Method::DELETE));
        assert_eq!(find_override(b"status=DONE&_method=PATCH"), Some(Method::PATCH));
        assert_eq!(find_override(b"_method=GET"), None);
        assert_eq!(find_override(b"method=DELETE"), None);
    }

    #[tokio::test]
    async fn query_override_wins() {
        let out = send(form_post("/tasks/1?_method=DELETE", "")).await;
        assert_eq!(out, "DELETE ");
    }

    #[tokio::test]
    async fn body_override_keeps_body_for_handler() {
        let out = send(form_post("/tasks/1", "_method=PATCH&status=COMPLETED")).await;
        assert_eq!(out, "PATCH _method=PATCH&status=COMPLETED");
    }

    #[tokio::test]
    async fn unsupported_override_is_ignored() {
        let out = send(form_post("/tasks/1", "_method=TRACE")).await;
        assert_eq!(out, "POST _method=TRACE");
    }

    #[tokio::test]
    async fn large_form_body_reaches_handler() {
        let body = format!("description={}&_method=PATCH", "x".repeat(70 * 1024));
        let out = send(form_post("/tasks/1", body.clone())).await;
        assert_eq!(out, format!("PATCH {body}"));
    }

    #[tokio::test]
    async fn form_body_over_limit_is_too_large() {
        let body = "x".repeat(MAX_FORM_BYTES + 1);
        let response = echo_method_app()
            .oneshot(form_post("/tasks/1", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn non_post_requests_pass_through() {
        let req = Request::builder()
            .uri("/tasks/1?_method=DELETE")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(req).await, "GET ");
    }
}
