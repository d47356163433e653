//! JSON error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rush_core::PredictionFailure;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("{error}")]
    BadRequest { error: String, extra: Option<(&'static str, Value)> },
    /// A provider or the model failed; `error` names the operation.
    #[error("{error}: {message}")]
    Upstream { error: &'static str, message: String },
    /// A capability is not configured on this server.
    #[error("{error}")]
    Unavailable { error: String, hint: String },
    #[error(transparent)]
    Prediction(#[from] PredictionFailure),
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            extra: None,
        }
    }

    pub fn bad_request_with(error: impl Into<String>, key: &'static str, value: Value) -> Self {
        Self::BadRequest {
            error: error.into(),
            extra: Some((key, value)),
        }
    }

    pub fn upstream(error: &'static str, source: impl std::fmt::Display) -> Self {
        Self::Upstream {
            error,
            message: source.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::BadRequest { error, extra } => {
                let mut body = json!({ "error": error });
                if let Some((key, value)) = extra {
                    body[*key] = value.clone();
                }
                body
            }
            Self::Upstream { error, message } => json!({ "error": error, "message": message }),
            Self::Unavailable { error, hint } => json!({ "error": error, "hint": hint }),
            Self::Prediction(PredictionFailure::Unparseable { output, .. }) => json!({
                "error": "Failed to parse prediction result",
                "rawResult": output,
            }),
            Self::Prediction(failure) => {
                let details = failure.details();
                json!({
                    "error": "Prediction failed",
                    "details": if details.is_empty() { failure.to_string() } else { details },
                    "code": match failure {
                        PredictionFailure::Exit { code, .. } => json!(code),
                        _ => Value::Null,
                    },
                })
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request_with("Invalid JSON body", "message", json!(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_failures_carry_stderr_and_code() {
        let err = ApiError::from(PredictionFailure::Exit {
            code: Some(2),
            stderr: "model file missing".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body["error"], "Prediction failed");
        assert_eq!(body["details"], "model file missing");
        assert_eq!(body["code"], 2);
    }

    #[test]
    fn timeouts_still_explain_themselves() {
        let body = ApiError::from(PredictionFailure::Timeout).body();
        assert_eq!(body["details"], "prediction timed out");
        assert!(body["code"].is_null());
    }

    #[test]
    fn bad_request_merges_extra_field() {
        let body = ApiError::bad_request_with(
            "Missing required fields",
            "required",
            json!(["areaName"]),
        )
        .body();
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(body["required"][0], "areaName");
    }
}
