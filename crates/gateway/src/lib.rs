//! HTTP API gateway for Lengthwise.
//!
//! Exposes `GET /api/health` and `POST /api/enhance` for browser and CLI
//! callers. Built on Axum.

pub mod api;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use lengthwise_config::AppConfig;
use lengthwise_engine::{EnhanceSettings, EnhancementOrchestrator};

/// Request body ceiling.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub orchestrator: Arc<EnhancementOrchestrator>,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    /// Build state with the provider the config describes (if any).
    pub fn from_config(config: AppConfig) -> Self {
        let provider = lengthwise_providers::build_from_config(&config);
        let orchestrator = EnhancementOrchestrator::new(provider, EnhanceSettings::from_config(&config));
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS restricted to `gateway.allowed_origins`, credentials allowed
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origins);

    Router::new()
        .nest("/api", api::api_router(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(GatewayState::from_config(config));
    if !state.orchestrator.is_available() {
        warn!("API key is missing. AI features will be disabled until one is configured.");
    }

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use lengthwise_core::error::ProviderError;
    use lengthwise_core::message::Message;
    use lengthwise_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// A mock provider that returns a fixed response and counts calls.
    struct MockProvider {
        response: Result<String, ProviderError>,
        calls: Mutex<usize>,
    }

    impl MockProvider {
        fn text(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(text.into()),
                calls: Mutex::new(0),
            })
        }

        fn failing(err: ProviderError) -> Arc<Self> {
            Arc::new(Self {
                response: Err(err),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            self.response.clone().map(|text| ProviderResponse {
                message: Message::assistant(text),
                usage: None,
                model: "mock-model".into(),
            })
        }
    }

    fn state_with(provider: Option<Arc<dyn Provider>>) -> SharedState {
        let config = AppConfig::default();
        let orchestrator = EnhancementOrchestrator::new(provider, EnhanceSettings::from_config(&config));
        Arc::new(GatewayState {
            config,
            orchestrator: Arc::new(orchestrator),
        })
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn enhance_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/enhance")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ai_disabled_without_provider() {
        let app = build_router(state_with(None));
        let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["aiEnabled"], false);
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn health_reports_ai_enabled_with_provider() {
        let app = build_router(state_with(Some(MockProvider::text("x"))));
        let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();

        let body = json_body(app.oneshot(req).await.unwrap()).await;
        assert_eq!(body["aiEnabled"], true);
    }

    #[tokio::test]
    async fn enhance_success() {
        let provider = MockProvider::text(&format!("Subject: Hi\n\n{}", words(48)));
        let app = build_router(state_with(Some(provider.clone())));

        let response = app
            .oneshot(enhance_request(serde_json::json!({
                "content": "Please send the report.",
                "tone": "friendly",
                "targetWords": 50,
                "inputType": "email"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["wordCount"], 48);
        assert_eq!(body["subject"], "Hi");
        assert_eq!(body["enhancedContent"], words(48));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn enhance_too_long_returns_draft() {
        let app = build_router(state_with(Some(MockProvider::text(&format!(
            "Subject: Report\n\n{}",
            words(70)
        )))));

        let response = app
            .oneshot(enhance_request(serde_json::json!({
                "content": words(100),
                "targetWords": 50,
                "inputType": "email"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("70 words"));
        assert_eq!(body["enhancedContent"], words(70));
        assert_eq!(body["subject"], "Report");
    }

    #[tokio::test]
    async fn enhance_unavailable_without_provider() {
        let app = build_router(state_with(None));
        let response = app
            .oneshot(enhance_request(serde_json::json!({"content": "hi", "targetWords": 20})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn enhance_rejects_invalid_input_without_calling_model() {
        let provider = MockProvider::text("unused");
        let state = state_with(Some(provider.clone()));

        let cases = [
            serde_json::json!({"content": "", "targetWords": 20}),
            serde_json::json!({"content": "hello", "targetWords": 0}),
            serde_json::json!({"content": "hello", "targetWords": "many"}),
            serde_json::json!({"content": words(10_000), "targetWords": 50}),
        ];
        for case in cases {
            let response = build_router(state.clone())
                .oneshot(enhance_request(case))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = build_router(state_with(Some(MockProvider::text("unused"))));
        let req = Request::builder()
            .method("POST")
            .uri("/api/enhance")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn upstream_failures_map_to_status() {
        let cases = [
            (ProviderError::AuthenticationFailed("bad key".into()), StatusCode::UNAUTHORIZED),
            (ProviderError::RateLimited { retry_after_secs: 5 }, StatusCode::TOO_MANY_REQUESTS),
            (ProviderError::Network("reset".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let app = build_router(state_with(Some(MockProvider::failing(err))));
            let response = app
                .oneshot(enhance_request(serde_json::json!({"content": "hello", "targetWords": 30})))
                .await
                .unwrap();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_only() {
        let app = build_router(state_with(None));
        let req = Request::builder()
            .uri("/api/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers().get("access-control-allow-credentials").unwrap(),
            "true"
        );

        let app = build_router(state_with(None));
        let req = Request::builder()
            .uri("/api/health")
            .header("origin", "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = build_router(state_with(None));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
