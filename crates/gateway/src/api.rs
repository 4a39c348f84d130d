//! `/api` routes: health probe and the rewrite endpoint.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use lengthwise_core::error::RewriteFailure;
use lengthwise_core::rewrite::{DocumentType, RewriteRequest, ToneDescriptor};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::SharedState;

pub fn api_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/enhance", post(enhance_handler))
        .with_state(state)
}

// --- Types ---

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub ai_enabled: bool,
}

/// Incoming rewrite body. Every field is optional so that missing values
/// surface as rewrite failures rather than extractor errors.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    pub target_words: Option<serde_json::Value>,
    #[serde(default)]
    pub input_type: Option<String>,
}

impl EnhanceBody {
    /// Unparseable or non-positive targets become 0, which the
    /// orchestrator refuses as an invalid target.
    pub fn into_request(self) -> RewriteRequest {
        let target = self.target_words.as_ref().and_then(parse_target).unwrap_or(0);
        RewriteRequest::new(
            self.content.unwrap_or_default(),
            ToneDescriptor::new(self.tone.unwrap_or_default()),
            target,
            DocumentType::from(self.input_type.unwrap_or_default()),
        )
    }
}

fn parse_target(value: &serde_json::Value) -> Option<u32> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?,
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_content: String,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    /// The rejected draft, for too-long rewrites only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_content: Option<String>,
    /// Subject line of a rejected email draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn failure_response(failure: RewriteFailure) -> ApiError {
    let status = StatusCode::from_u16(failure.reason.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: failure.message,
            enhanced_content: failure.draft,
            subject: failure.subject,
        }),
    )
}

// --- Handlers ---

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        ai_enabled: state.orchestrator.is_available(),
    })
}

async fn enhance_handler(
    State(state): State<SharedState>,
    payload: Result<Json<EnhanceBody>, JsonRejection>,
) -> Result<Json<EnhanceResponse>, ApiError> {
    if !state.orchestrator.is_available() {
        return Err(failure_response(RewriteFailure::unavailable()));
    }

    let Json(body) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Malformed enhance request");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
                enhanced_content: None,
                subject: None,
            }),
        )
    })?;

    let request = body.into_request();
    debug!(
        target = request.target_words,
        tone = %request.tone,
        document_type = request.document_type.as_str(),
        "Enhance request received"
    );

    let result = state
        .orchestrator
        .enhance(&request)
        .await
        .map_err(failure_response)?;

    Ok(Json(EnhanceResponse {
        enhanced_content: result.body,
        word_count: result.word_count,
        subject: result.subject,
    }))
}
