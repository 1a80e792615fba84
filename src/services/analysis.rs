//! End-to-end analysis of one dashboard request.

use crate::error::{AppError, Result};
use crate::services::aggregator::ChartPipeline;
use crate::services::decision::{
    economic_events_or_fallback, fundamentals_or_fallback, user_facing_error, ContextProvider, DecisionEngine,
};
use crate::services::payload::DecisionPayload;
use crate::services::request_guard::RequestTracker;
use crate::types::{AnalysisRequest, AnalysisResult, IndicatorConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of [`AnalysisService::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    /// A newer request from the same session started first.
    Superseded,
}

/// Orchestrates chart computation, context lookups and the decision call.
pub struct AnalysisService {
    pipeline: ChartPipeline,
    decision: Arc<dyn DecisionEngine>,
    context: Arc<dyn ContextProvider>,
    tracker: RequestTracker,
}

impl AnalysisService {
    pub fn new(pipeline: ChartPipeline, decision: Arc<dyn DecisionEngine>, context: Arc<dyn ContextProvider>) -> Self {
        Self {
            pipeline,
            decision,
            context,
            tracker: RequestTracker::new(),
        }
    }

    pub fn pipeline(&self) -> &ChartPipeline {
        &self.pipeline
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome> {
        let config = IndicatorConfig::from_selection(&request.indicator)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown indicator selection: {}", request.indicator)))?;
        let symbol = request.symbol.to_uppercase();

        let session = request
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut token = self.tracker.begin(&session);

        let outcome = token.run(self.run_analysis(&symbol, &request, &config)).await;
        self.tracker.release(&token);

        match outcome {
            Some(result) => result.map(AnalysisOutcome::Completed),
            None => {
                info!("Discarding superseded analysis for {} (session {})", symbol, session);
                Ok(AnalysisOutcome::Superseded)
            }
        }
    }

    async fn run_analysis(
        &self,
        symbol: &str,
        request: &AnalysisRequest,
        config: &IndicatorConfig,
    ) -> Result<AnalysisResult> {
        let primary = request.primary_timeframe;
        let (candles, indicators) = self
            .pipeline
            .series(symbol, primary, self.pipeline.limit(), config)
            .await?;

        let include_context = request.include_fundamentals;
        let (chart, additional, fundamentals, events) = tokio::join!(
            self.pipeline.render(&candles, &indicators),
            self.pipeline
                .aggregate(symbol, primary, &request.additional_timeframes, config),
            async {
                if include_context {
                    Some(fundamentals_or_fallback(self.context.as_ref(), symbol).await)
                } else {
                    None
                }
            },
            async {
                if include_context {
                    Some(economic_events_or_fallback(self.context.as_ref(), symbol).await)
                } else {
                    None
                }
            },
        );
        let chart = chart?;

        let payload = additional.iter().fold(
            DecisionPayload::assemble(&candles, &indicators, chart.clone())?
                .with_preferences(request.preferences)
                .with_context(fundamentals.as_ref(), events.as_ref()),
            |payload, (key, artifact)| payload.with_additional_chart(key, artifact.image.clone()),
        );

        info!(
            "Requesting analysis for {} {} with {} additional timeframes",
            symbol,
            primary,
            additional.len()
        );

        let analysis = self.decision.generate_signal(&payload).await.map_err(|e| {
            warn!("Decision step failed for {}: {}", symbol, e);
            let message = match e {
                AppError::UpstreamUnavailable(msg) => msg,
                other => other.to_string(),
            };
            AppError::UpstreamUnavailable(user_facing_error(&message))
        })?;

        Ok(AnalysisResult {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            analysis,
            chart_image: chart,
        })
    }
}
