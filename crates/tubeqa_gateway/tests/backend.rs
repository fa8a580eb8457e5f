use std::time::Duration;

use pretty_assertions::assert_eq;
use tubeqa_gateway::{
    ApiError, AskResponse, Backend, DeleteResponse, GatewaySettings, HealthResponse,
    IngestResponse, ReqwestBackend, GENERIC_SERVER_DETAIL, UNREACHABLE_MESSAGE,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(GatewaySettings {
        base_url: server.uri(),
        ..GatewaySettings::default()
    })
}

#[tokio::test]
async fn ingest_posts_url_and_decodes_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "youtube_url": "https://www.youtube.com/watch?v=abc123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "ok",
            "video_id": "abc123",
            "chunks_created": 12,
            "title": "Intro",
            "suggested_questions": ["What is X?"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend_for(&server)
        .ingest("https://www.youtube.com/watch?v=abc123")
        .await;

    assert_eq!(
        result,
        Ok(IngestResponse {
            message: "ok".to_string(),
            video_id: "abc123".to_string(),
            chunks_created: 12,
            title: "Intro".to_string(),
            suggested_questions: vec!["What is X?".to_string()],
        })
    );
}

#[tokio::test]
async fn ask_with_scope_sends_video_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(serde_json::json!({
            "question": "What happens at 3:00?",
            "video_id": "abc123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "It explains Y",
            "sources": ["abc123"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend_for(&server)
        .ask("What happens at 3:00?", Some("abc123"))
        .await;

    assert_eq!(
        result,
        Ok(AskResponse {
            answer: "It explains Y".to_string(),
            sources: vec!["abc123".to_string()],
        })
    );
}

#[tokio::test]
async fn ask_without_scope_omits_video_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_json(serde_json::json!({ "question": "Anything?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "Yes",
            "sources": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert!(backend.ask("Anything?", None).await.is_ok());
    // An empty scope is the same as no scope.
    assert!(backend.ask("Anything?", Some("")).await.is_ok());
}

#[tokio::test]
async fn health_and_clear_use_get_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "message": "ready"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Deleted 42 chunks",
            "deleted_count": 42
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert_eq!(
        backend.check_health().await,
        Ok(HealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            message: "ready".to_string(),
        })
    );
    assert_eq!(
        backend.clear_all().await,
        Ok(DeleteResponse {
            message: "Deleted 42 chunks".to_string(),
            deleted_count: 42,
        })
    );
}

#[tokio::test]
async fn base_url_with_trailing_slash_and_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "message": "ready"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(GatewaySettings {
        base_url: format!("{}/api/", server.uri()),
        ..GatewaySettings::default()
    });
    assert!(backend.check_health().await.is_ok());
}

#[tokio::test]
async fn client_errors_surface_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "detail": "Video abc123 not found" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .ask("q", Some("abc123"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 404,
            detail: "Video abc123 not found".to_string(),
        }
    );
    assert_eq!(err.to_string(), "Video abc123 not found");
}

#[tokio::test]
async fn server_errors_are_prefixed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "detail": "transcript service down" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .ingest("https://youtu.be/abc")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Server error: transcript service down");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn error_without_detail_uses_generic_text() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = backend_for(&server).clear_all().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Server error: {GENERIC_SERVER_DETAIL}")
    );
}

#[tokio::test]
async fn malformed_success_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = backend_for(&server).check_health().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(err.to_string(), UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop a listener so the port is closed.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}", listener.local_addr().expect("addr"))
    };
    let backend = ReqwestBackend::new(GatewaySettings {
        base_url: uri,
        connect_timeout: Duration::from_millis(500),
        request_timeout: Some(Duration::from_secs(2)),
    });

    let err = backend.ask("q", None).await.unwrap_err();
    assert_eq!(err.to_string(), UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn request_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(serde_json::json!({})),
        )
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(GatewaySettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..GatewaySettings::default()
    });
    let err = backend.ingest("https://youtu.be/x").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { reason } if reason.starts_with("timeout")));
}
