//! Trade recommendations derived from ranked impacts.

use serde::Serialize;
use std::fmt;

use super::analyzer::AnalysisReport;
use super::entity::normalize;
use super::graph::ImpactDirection;

pub const MAX_RECOMMENDATIONS: usize = 6;

/// Confidence attached to the story-level recommendation built from a ticker hint.
pub const STORY_CONFIDENCE: f64 = 0.71;

const BEARISH_WORDS: &[&str] = &[
    "pulls out", "pull out", "falls", "fall", "cuts", "weak", "slumps", "slump", "loss",
    "down", "drag", "collapse", "warning",
];
const BULLISH_WORDS: &[&str] = &[
    "surge", "jump", "rises", "rise", "beat", "beats", "strong", "gain", "gains", "higher",
    "up", "lift",
];

const DEFAULT_SYMBOLS: &[(&str, &str)] = &[
    ("Banks", "BARC.L"),
    ("Housebuilders", "BDEV.L"),
    ("Airlines", "IAG.L"),
    ("Energy Producers", "SHEL.L"),
    ("Exporters", "ULVR.L"),
    ("Interest Rates", "UK10Y"),
    ("Oil", "BRN"),
    ("Strong GBP", "GBPUSD"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
    Watch,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("BUY"),
            TradeAction::Sell => f.write_str("SELL"),
            TradeAction::Watch => f.write_str("WATCH"),
        }
    }
}

impl From<ImpactDirection> for TradeAction {
    fn from(direction: ImpactDirection) -> Self {
        match direction {
            ImpactDirection::Positive => TradeAction::Buy,
            ImpactDirection::Negative => TradeAction::Sell,
            ImpactDirection::Mixed => TradeAction::Watch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub entity: String,
    pub action: TradeAction,
    pub suggested_symbol: String,
    pub confidence: f64,
    pub rationale: String,
}

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    // (entity name, ticker); looked up case-insensitively.
    symbols: Vec<(String, String)>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        RecommendationEngine {
            symbols: DEFAULT_SYMBOLS
                .iter()
                .map(|(entity, ticker)| (entity.to_string(), ticker.to_string()))
                .collect(),
        }
    }
}

impl RecommendationEngine {
    /// Defaults plus overrides. An override for a known entity replaces its ticker.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut engine = Self::default();
        for (entity, ticker) in overrides {
            let ticker = ticker.trim().to_uppercase();
            match engine
                .symbols
                .iter_mut()
                .find(|(name, _)| normalize(name) == normalize(&entity))
            {
                Some(entry) => entry.1 = ticker,
                None => engine.symbols.push((entity.trim().to_string(), ticker)),
            }
        }
        engine
    }

    pub fn symbol_for(&self, entity: &str) -> String {
        let key = normalize(entity);
        self.symbols
            .iter()
            .find(|(name, _)| normalize(name) == key)
            .map(|(_, ticker)| ticker.clone())
            .unwrap_or_else(|| synthetic_ticker(entity))
    }

    pub fn recommend(
        &self,
        report: &AnalysisReport,
        symbol_hint: Option<&str>,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = report
            .ranked_impacts
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|impact| Recommendation {
                entity: impact.entity.canonical_name.clone(),
                action: impact.direction.into(),
                suggested_symbol: self.symbol_for(&impact.entity.canonical_name),
                confidence: impact.score,
                rationale: impact.rationale.clone(),
            })
            .collect();

        let hint = symbol_hint.map(|s| s.trim().to_uppercase()).unwrap_or_default();
        let already_used = recommendations.iter().any(|r| r.suggested_symbol == hint);
        if !hint.is_empty() && !already_used && recommendations.len() < MAX_RECOMMENDATIONS {
            recommendations.push(Recommendation {
                entity: self.entity_for(&hint),
                action: sentiment(&report.event.raw_text),
                suggested_symbol: hint,
                confidence: STORY_CONFIDENCE,
                rationale: "Automatic story-level recommendation based on detected ticker context."
                    .into(),
            });
        }
        recommendations
    }

    fn entity_for(&self, ticker: &str) -> String {
        self.symbols
            .iter()
            .find(|(_, t)| t.eq_ignore_ascii_case(ticker))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| ticker.to_string())
    }
}

/// Keyword sentiment of the story text; bearish words win over bullish ones.
pub fn sentiment(text: &str) -> TradeAction {
    let text = normalize(text);
    if BEARISH_WORDS.iter().any(|w| text.contains(w)) {
        TradeAction::Sell
    } else if BULLISH_WORDS.iter().any(|w| text.contains(w)) {
        TradeAction::Buy
    } else {
        TradeAction::Watch
    }
}

fn synthetic_ticker(entity: &str) -> String {
    entity
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
