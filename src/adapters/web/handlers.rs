//! HTTP request handlers for the web adapter.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::analyzer::AnalysisReport;
use crate::domain::error::HeliosError;
use crate::domain::portfolio::PortfolioView;
use crate::domain::recommendation::Recommendation;
use crate::domain::trade::{TradeExecution, TradeSide, TradeTicket};

use super::{AppState, WebError};

/// Trade body as posted; `side` stays a string so a bad value gets the ledger's message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeRequest {
    pub symbol: String,
    pub side: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub note: String,
    pub story_id: String,
    pub story_title: String,
}

impl TradeRequest {
    fn into_ticket(self) -> Result<TradeTicket, WebError> {
        let side = match self.side.as_deref() {
            Some(raw) => Some(raw.parse::<TradeSide>()?),
            None => None,
        };
        Ok(TradeTicket {
            symbol: self.symbol,
            side,
            quantity: self.quantity,
            price: self.price,
            note: self.note,
            story_id: self.story_id,
            story_title: self.story_title,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub headline: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub text: String,
    #[serde(default)]
    pub symbol_hint: Option<String>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, WebError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| WebError::bad_request(rejection.body_text()))
}

fn required_text(value: &str, field: &str) -> Result<(), HeliosError> {
    if value.trim().is_empty() {
        return Err(HeliosError::MissingInput {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub async fn get_portfolio(State(state): State<Arc<AppState>>) -> Json<PortfolioView> {
    Json(state.ledger.snapshot())
}

pub async fn post_trade(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TradeRequest>, JsonRejection>,
) -> Result<Json<TradeExecution>, WebError> {
    let ticket = body(payload)?.into_ticket()?;
    Ok(Json(state.ledger.execute(&ticket)?))
}

pub async fn post_explain(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, WebError> {
    let request = body(payload)?;
    required_text(&request.headline, "headline")?;
    Ok(Json(state.analyzer.analyze(request.headline.trim())))
}

pub async fn post_recommendations(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<Vec<Recommendation>>, WebError> {
    let request = body(payload)?;
    required_text(&request.text, "text")?;
    let report = state.analyzer.analyze(request.text.trim());
    Ok(Json(
        state
            .recommender
            .recommend(&report, request.symbol_hint.as_deref()),
    ))
}

pub async fn not_found() -> WebError {
    WebError::not_found("Not found")
}
