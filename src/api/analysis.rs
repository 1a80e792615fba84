use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::AnalysisOutcome;
use crate::sources::binance::is_supported_symbol;
use crate::types::AnalysisRequest;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

/// POST /api/analysis
///
/// Responds 204 when a newer request from the same session replaced this one.
async fn create_analysis(State(state): State<AppState>, Json(request): Json<AnalysisRequest>) -> Result<Response> {
    if !is_supported_symbol(&request.symbol) {
        return Err(AppError::NotFound(format!("Unknown symbol: {}", request.symbol)));
    }

    match state.analysis.analyze(request).await? {
        AnalysisOutcome::Completed(result) => Ok(Json(ApiResponse::new(result)).into_response()),
        AnalysisOutcome::Superseded => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_analysis))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{send, state, state_with, FakeDecision};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analysis")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_analysis_route() {
        let request = json!({
            "symbol": "BTCUSDT",
            "primaryTimeframe": "4h",
            "additionalTimeframes": ["1d", "1h", "4h"],
        });
        let (status, body) = send(state(), post(request)).await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["analysis"]["analysisSummary"], "2 additional charts");
        assert_eq!(data["chartImage"], "data:image/png;base64,120");
        assert!(data["id"].as_str().is_some());
        assert!(data["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_analysis_decision_failure() {
        let failing = state_with(FakeDecision {
            fail_with: Some("14 UNAVAILABLE: model overloaded".into()),
        });
        let request = json!({"symbol": "ETHUSDT", "primaryTimeframe": "1h"});
        let (status, body) = send(failing, post(request)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"],
            "Failed to get analysis: The AI model is currently unavailable. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_analysis_bad_indicator() {
        let request = json!({"symbol": "BTCUSDT", "primaryTimeframe": "1h", "indicator": "vwap"});
        let (status, _) = send(state(), post(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analysis_unknown_symbol() {
        let request = json!({"symbol": "FOOUSDT", "primaryTimeframe": "1h"});
        let (status, _) = send(state(), post(request)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
