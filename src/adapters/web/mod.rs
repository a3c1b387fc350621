//! HTTP API adapter.
//!
//! JSON endpoints over one shared analyzer, recommendation engine and ledger.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::domain::analyzer::Analyzer;
use crate::domain::config_validation::AppConfig;
use crate::domain::error::HeliosError;
use crate::domain::graph::KnowledgeBase;
use crate::domain::ledger::Ledger;
use crate::domain::recommendation::RecommendationEngine;

pub struct AppState {
    pub analyzer: Analyzer,
    pub recommender: RecommendationEngine,
    pub ledger: Ledger,
}

impl AppState {
    pub fn new(config: &AppConfig, knowledge: KnowledgeBase) -> Result<Self, HeliosError> {
        Ok(AppState {
            analyzer: Analyzer::from_knowledge_base(knowledge)?,
            recommender: RecommendationEngine::with_overrides(config.symbols.clone()),
            ledger: Ledger::new(config.starting_cash)?,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/portfolio", get(handlers::get_portfolio))
        .route("/api/trades", post(handlers::post_trade))
        .route("/api/explain", post(handlers::post_explain))
        .route("/api/recommendations", post(handlers::post_recommendations))
        .fallback(handlers::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(Arc::new(state))
}
