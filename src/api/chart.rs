use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::sources::binance::is_supported_symbol;
use crate::types::{CandleSeries, IndicatorConfig, IndicatorSet, Timeframe};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Largest page the klines provider serves.
const MAX_LIMIT: u32 = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub interval: Option<String>,
    pub limit: Option<u32>,
    pub indicators: Option<String>,
}

/// Validated chart request parameters.
#[derive(Debug, Clone, PartialEq)]
struct ChartParams {
    symbol: String,
    timeframe: Timeframe,
    limit: u32,
    config: IndicatorConfig,
}

impl ChartParams {
    fn parse(symbol: &str, query: &ChartQuery, default_limit: u32) -> Result<Self> {
        let symbol = symbol.to_uppercase();
        if !is_supported_symbol(&symbol) {
            return Err(AppError::NotFound(format!("Unknown symbol: {}", symbol)));
        }

        let timeframe = match &query.interval {
            Some(label) => Timeframe::from_str(label)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid interval: {}", label)))?,
            None => Timeframe::FourHours,
        };

        let limit = query.limit.unwrap_or(default_limit);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        let selection = query.indicators.as_deref().unwrap_or("all");
        let config = IndicatorConfig::from_selection(selection)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid indicators: {}", selection)))?;

        Ok(Self {
            symbol,
            timeframe,
            limit,
            config,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub symbol: String,
    pub interval: Timeframe,
    pub candles: CandleSeries,
    pub indicators: IndicatorSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotResponse {
    pub data_uri: String,
}

/// GET /api/chart/:symbol
async fn get_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<ChartResponse>>> {
    let params = ChartParams::parse(&symbol, &query, state.config.kline_limit)?;
    let (candles, indicators) = state
        .analysis
        .pipeline()
        .series(&params.symbol, params.timeframe, params.limit, &params.config)
        .await?;

    Ok(Json(ApiResponse::new(ChartResponse {
        symbol: params.symbol,
        interval: params.timeframe,
        candles,
        indicators,
    })))
}

/// GET /api/chart/:symbol/snapshot
async fn get_snapshot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ApiResponse<SnapshotResponse>>> {
    let params = ChartParams::parse(&symbol, &query, state.config.kline_limit)?;
    let pipeline = state.analysis.pipeline();
    let (candles, indicators) = pipeline
        .series(&params.symbol, params.timeframe, params.limit, &params.config)
        .await?;
    let data_uri = pipeline.render(&candles, &indicators).await?;

    Ok(Json(ApiResponse::new(SnapshotResponse { data_uri })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_chart))
        .route("/:symbol/snapshot", get(get_snapshot))
}
