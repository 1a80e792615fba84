//! Per-timeframe chart pipeline and multi-timeframe fan-out.

use crate::error::{AppError, Result};
use crate::services::normalizer::normalize;
use crate::services::render::Renderer;
use crate::sources::KlineSource;
use crate::types::{sanitize_label, CandleSeries, IndicatorConfig, IndicatorSet, Timeframe};
use futures_util::{stream, StreamExt};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Candles, indicators and rendered image for one timeframe.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub timeframe: Timeframe,
    pub candles: CandleSeries,
    pub indicators: IndicatorSet,
    pub image: String,
}

/// Drives fetch → normalize → compute → render for a single timeframe.
#[derive(Clone)]
pub struct ChartPipeline {
    source: Arc<dyn KlineSource>,
    renderer: Arc<dyn Renderer>,
    limit: u32,
    max_concurrent: usize,
}

impl ChartPipeline {
    pub fn new(source: Arc<dyn KlineSource>, renderer: Arc<dyn Renderer>, limit: u32, max_concurrent: usize) -> Self {
        Self {
            source,
            renderer,
            limit,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fetch and normalize candles, then compute the enabled indicators.
    pub async fn series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
        config: &IndicatorConfig,
    ) -> Result<(CandleSeries, IndicatorSet)> {
        let records = self.source.fetch_klines(symbol, timeframe, limit).await?;
        let candles = normalize(&records)?;
        let indicators = IndicatorSet::compute(&candles, config);
        debug!("Computed {} {} over {} candles", symbol, timeframe, candles.len());
        Ok((candles, indicators))
    }

    /// Render off the async runtime.
    pub async fn render(&self, candles: &CandleSeries, indicators: &IndicatorSet) -> Result<String> {
        let renderer = self.renderer.clone();
        let candles = candles.clone();
        let indicators = indicators.clone();
        tokio::task::spawn_blocking(move || renderer.snapshot(&candles, &indicators))
            .await
            .map_err(|e| AppError::Internal(format!("render task failed: {}", e)))?
    }

    /// Full cycle for one timeframe.
    pub async fn run(&self, symbol: &str, timeframe: Timeframe, config: &IndicatorConfig) -> Result<ChartArtifact> {
        let (candles, indicators) = self.series(symbol, timeframe, self.limit, config).await?;
        let image = self.render(&candles, &indicators).await?;
        Ok(ChartArtifact {
            timeframe,
            candles,
            indicators,
            image,
        })
    }

    /// Run every additional timeframe, keyed by sanitized label.
    ///
    /// Labels equal to the primary timeframe, duplicates and unknown labels
    /// are skipped. A failing timeframe is logged and left out of the map.
    pub async fn aggregate(
        &self,
        symbol: &str,
        primary: Timeframe,
        labels: &[String],
        config: &IndicatorConfig,
    ) -> BTreeMap<String, ChartArtifact> {
        let plan = plan_timeframes(primary, labels);

        let results: Vec<(String, Result<ChartArtifact>)> = stream::iter(plan)
            .map(|(key, timeframe)| async move { (key, self.run(symbol, timeframe, config).await) })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut bundle = BTreeMap::new();
        for (key, result) in results {
            match result {
                Ok(artifact) => {
                    bundle.insert(key, artifact);
                }
                Err(e) => warn!("Skipping {} timeframe {}: {}", symbol, key, e),
            }
        }
        bundle
    }
}

/// Sanitized keys and timeframes to fetch, in first-seen order.
pub fn plan_timeframes(primary: Timeframe, labels: &[String]) -> Vec<(String, Timeframe)> {
    let mut seen = HashSet::new();
    let mut plan = Vec::new();

    for label in labels {
        let key = sanitize_label(label);
        let Some(timeframe) = Timeframe::from_str(&key) else {
            warn!("Ignoring unknown timeframe {:?}", label);
            continue;
        };
        if timeframe == primary || !seen.insert(timeframe) {
            continue;
        }
        plan.push((key, timeframe));
    }

    plan
}
