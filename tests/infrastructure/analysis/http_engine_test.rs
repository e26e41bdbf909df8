use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use semporna::application::ports::{AnalysisEngine, AnalysisError};
use semporna::domain::AnalysisRequest;
use semporna::infrastructure::analysis::HttpAnalysisEngine;

fn request() -> AnalysisRequest {
    AnalysisRequest {
        domain: "SOCIAL".to_string(),
        paragraph_number: "2".to_string(),
    }
}

async fn start_mock_analysis_api(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = format!("http://{}/analyze", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (endpoint, shutdown_tx)
}

fn fixed_response_api(response_status: u16, response_body: &'static str) -> Router {
    Router::new().route(
        "/analyze",
        post(move || async move {
            let status = StatusCode::from_u16(response_status).unwrap();
            (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                response_body,
            )
                .into_response()
        }),
    )
}

#[tokio::test]
async fn given_ok_response_when_analyzing_then_returns_payload() {
    let body = r#"{"success": true, "word_lists": {"mispronounced": []}}"#;
    let (endpoint, shutdown_tx) = start_mock_analysis_api(fixed_response_api(200, body)).await;

    let engine = HttpAnalysisEngine::new(endpoint, Duration::from_secs(5));
    let result = engine.analyze(b"fake audio", "take.wav", &request()).await;

    let payload = result.unwrap();
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["word_lists"], json!({"mispronounced": []}));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_api_rejection_when_analyzing_then_upstream_error_preserves_body() {
    let body = r#"{"success": false, "error": "'paragraph_number' must be a valid integer"}"#;
    let (endpoint, shutdown_tx) = start_mock_analysis_api(fixed_response_api(400, body)).await;

    let engine = HttpAnalysisEngine::new(endpoint, Duration::from_secs(5));
    let result = engine.analyze(b"fake audio", "take.wav", &request()).await;

    match result {
        Err(AnalysisError::Upstream { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(
                body["error"],
                json!("'paragraph_number' must be a valid integer")
            );
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_echoing_api_when_analyzing_then_all_fields_are_forwarded() {
    let app = Router::new().route(
        "/analyze",
        post(|mut multipart: Multipart| async move {
            let mut received = serde_json::Map::new();
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_string();
                if name == "audio_file" {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.unwrap().len();
                    received.insert(name, json!({"filename": filename, "bytes": bytes}));
                } else {
                    received.insert(name, Value::String(field.text().await.unwrap()));
                }
            }
            Json(json!({"word_lists": [], "received": received}))
        }),
    );
    let (endpoint, shutdown_tx) = start_mock_analysis_api(app).await;

    let engine = HttpAnalysisEngine::new(endpoint, Duration::from_secs(5));
    let result = engine
        .analyze(b"0123456789", "audio_file-1-2.wav", &request())
        .await
        .unwrap();

    assert_eq!(
        result["received"]["audio_file"],
        json!({"filename": "audio_file-1-2.wav", "bytes": 10})
    );
    assert_eq!(result["received"]["domain"], json!("SOCIAL"));
    assert_eq!(result["received"]["paragraph_number"], json!("2"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_api_when_analyzing_then_returns_unavailable() {
    // Bind then drop to obtain a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/analyze", listener.local_addr().unwrap());
    drop(listener);

    let engine = HttpAnalysisEngine::new(endpoint, Duration::from_secs(5));
    let result = engine.analyze(b"fake audio", "take.wav", &request()).await;

    assert!(matches!(result, Err(AnalysisError::Unavailable(_))));
}

#[tokio::test]
async fn given_api_slower_than_the_deadline_when_analyzing_then_returns_unavailable() {
    let app = Router::new().route(
        "/analyze",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let (endpoint, shutdown_tx) = start_mock_analysis_api(app).await;

    let engine = HttpAnalysisEngine::new(endpoint, Duration::from_millis(250));
    let result = engine.analyze(b"fake audio", "take.wav", &request()).await;

    assert!(matches!(result, Err(AnalysisError::Unavailable(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_success_body_when_analyzing_then_returns_internal_error() {
    let (endpoint, shutdown_tx) =
        start_mock_analysis_api(fixed_response_api(200, "plain text transcript")).await;

    let engine = HttpAnalysisEngine::new(endpoint, Duration::from_secs(5));
    let result = engine.analyze(b"fake audio", "take.wav", &request()).await;

    assert!(matches!(result, Err(AnalysisError::Internal(_))));
    shutdown_tx.send(()).ok();
}
