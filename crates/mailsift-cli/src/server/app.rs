//! Axum application setup.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::handlers;
use super::state::AppState;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState, allow_origin: HeaderValue) -> Router {
    // Browsers may only call the API from the configured frontend origin.
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_DISPOSITION,
            handlers::KEPT_HEADER,
            handlers::ROWS_HEADER,
        ]);

    let api_routes = Router::new()
        .route("/upload", post(handlers::upload))
        .route("/preview", post(handlers::preview_upload))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the web server; returns after Ctrl+C.
pub async fn run_server(
    state: AppState,
    port: u16,
    allow_origin: HeaderValue,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state, allow_origin);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use mailsift::{Mailsift, StaticOracle};
    use tower::ServiceExt;

    const BOUNDARY: &str = "mailsift-test-boundary";

    fn router(oracle: StaticOracle) -> Router {
        create_router(
            AppState::new(Mailsift::new(oracle)),
            HeaderValue::from_static("http://localhost:5173"),
        )
    }

    fn multipart_request(uri: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, file_name
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(StaticOracle::new())
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["oracle"], "static");
    }

    #[tokio::test]
    async fn test_upload_returns_workbook() {
        let request = multipart_request(
            "/api/upload",
            "contacts.csv",
            b"email,name\nA@x.com,Alice\na@x.com,Alice2\nb@y.com,Bob\n",
        );
        let response = router(StaticOracle::with_sent(["a@x.com"]))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=filtered_output.xlsx"
        );
        assert_eq!(
            headers[header::CONTENT_TYPE],
            mailsift::output::XLSX_CONTENT_TYPE
        );
        assert_eq!(headers[handlers::KEPT_HEADER], "1");
        assert_eq!(headers[handlers::ROWS_HEADER], "3");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_extension() {
        let request = multipart_request("/api/upload", "contacts.txt", b"email\na@x.com\n");
        let response = router(StaticOracle::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "unsupported_format");
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let request = multipart_request("/api/upload", "contacts.csv", b"");
        let response = router(StaticOracle::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_upload_missing_email_column() {
        let request = multipart_request("/api/upload", "contacts.csv", b"name,phone\nAlice,555\n");
        let response = router(StaticOracle::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "missing_column");
    }

    #[tokio::test]
    async fn test_preview() {
        let request = multipart_request("/api/preview", "contacts.csv", b"name,phone\nAlice,555\n");
        let response = router(StaticOracle::new()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["headers"], serde_json::json!(["name", "phone"]));
        assert_eq!(body["rows"], serde_json::json!([["Alice", "555"]]));
        assert_eq!(body["truncated"], false);
    }
}
