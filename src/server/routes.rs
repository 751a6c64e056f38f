// REST API routes
// Every /api/generate outcome is a GenieResult; only malformed requests get a 4xx.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{AppState, RequestLimits};
use crate::error::InputError;
use crate::genie::{GenieResult, SynthesisMode};
use crate::vocab::VocabularyListing;

// ---- Request/Response types ----

/// Validated body of POST /api/generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub mode: SynthesisMode,
}

impl GenerateRequest {
    /// Check content type, size and shape, in that order
    pub fn from_parts(
        headers: &HeaderMap,
        body: Result<Bytes, BytesRejection>,
        limits: &RequestLimits,
    ) -> Result<Self, InputError> {
        if !is_json(headers) {
            return Err(InputError::UnsupportedContentType);
        }

        let body = body.map_err(|rejection| InputError::BodyRejected {
            status: rejection.status().as_u16(),
            reason: rejection.body_text(),
        })?;

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| InputError::MalformedBody(e.to_string()))?;
        let Value::Object(mut object) = value else {
            return Err(InputError::MalformedBody("expected a JSON object".to_string()));
        };

        let prompt = match object.remove("prompt") {
            None | Some(Value::Null) => return Err(InputError::MissingPrompt),
            Some(Value::String(prompt)) => prompt,
            Some(_) => return Err(InputError::PromptNotString),
        };

        let actual = prompt.chars().count();
        if actual > limits.max_prompt_chars {
            return Err(InputError::PromptTooLong {
                max: limits.max_prompt_chars,
                actual,
            });
        }

        let mode = match object.remove("mode") {
            None | Some(Value::Null) => SynthesisMode::default(),
            Some(mode) => serde_json::from_value(mode).map_err(|_| InputError::InvalidMode)?,
        };

        Ok(Self { prompt, mode })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: Option<String>,
}

// ---- Route registration ----

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/generate", post(generate).fallback(method_not_allowed))
        .route("/api/health", get(health))
        .route("/api/vocabulary", get(vocabulary))
}

// ---- Handlers ----

async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request = match GenerateRequest::from_parts(&headers, body, &state.limits) {
        Ok(request) => request,
        Err(e) => return reject(e),
    };

    let result = state
        .synthesizer
        .generate(&request.prompt, request.mode)
        .await;
    Json(result).into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST, OPTIONS")],
        Json(GenieResult::failure("Method not allowed; use POST")),
    )
        .into_response()
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.synthesizer.provider_name().map(str::to_string),
    })
}

async fn vocabulary(State(state): State<Arc<AppState>>) -> Json<VocabularyListing<'static>> {
    Json(state.vocab.listing())
}

fn reject(error: InputError) -> Response {
    let status = error.status();
    warn!(%status, error = %error, "Request rejected");
    (status, Json(GenieResult::failure(error.to_string()))).into_response()
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn parse(body: &str) -> Result<GenerateRequest, InputError> {
        GenerateRequest::from_parts(
            &json_headers(),
            Ok(Bytes::from(body.to_string())),
            &RequestLimits::new(20),
        )
    }

    #[test]
    fn test_parse_valid_requests() {
        assert_eq!(
            parse(r#"{"prompt": "Perkeo"}"#).unwrap(),
            GenerateRequest {
                prompt: "Perkeo".to_string(),
                mode: SynthesisMode::Auto
            }
        );
        assert_eq!(
            parse(r#"{"prompt": "", "mode": "local"}"#).unwrap().mode,
            SynthesisMode::Local
        );
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(parse(r#"{}"#), Err(InputError::MissingPrompt));
        assert_eq!(parse(r#"{"prompt": null}"#), Err(InputError::MissingPrompt));
        assert_eq!(parse(r#"{"prompt": 42}"#), Err(InputError::PromptNotString));
        assert_eq!(
            parse(r#"{"prompt": "Perkeo", "mode": "turbo"}"#),
            Err(InputError::InvalidMode)
        );
        assert!(matches!(parse("not json"), Err(InputError::MalformedBody(_))));
        assert!(matches!(parse(r#"["prompt"]"#), Err(InputError::MalformedBody(_))));
        assert_eq!(
            parse(r#"{"prompt": "aaaaaaaaaaaaaaaaaaaaa"}"#),
            Err(InputError::PromptTooLong { max: 20, actual: 21 })
        );
    }

    #[test]
    fn test_prompt_limit_counts_characters() {
        // 20 two-byte characters fit a 20 character limit
        let body = format!(r#"{{"prompt": "{}"}}"#, "é".repeat(20));
        assert!(parse(&body).is_ok());
    }

    #[test]
    fn test_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        assert!(is_json(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.genie+json"),
        );
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }
}
