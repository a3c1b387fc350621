//! Causal impact propagation over the knowledge graph.
//!
//! Each seed is walked depth-first up to [`MAX_DEPTH`] hops. Every link visited adds a
//! signed contribution to its target; the contributions are then collapsed into one
//! [`ImpactResult`] per target and ranked by score.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::entity::{Entity, EntityId};
use super::graph::{ImpactDirection, KnowledgeGraph};

/// Deepest hop that is still scored. Depth 1 is a direct neighbour of a seed.
pub const MAX_DEPTH: usize = 2;

/// Multiplier applied to contributions computed beyond the first hop.
pub const MULTI_HOP_DECAY: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactResult {
    pub entity: Entity,
    pub direction: ImpactDirection,
    pub score: f64,
    pub rationale: String,
}

#[derive(Debug)]
struct ScoreAccumulator {
    target: EntityId,
    positive: f64,
    negative: f64,
    net: f64,
    rationale: String,
}

impl ScoreAccumulator {
    fn new(target: EntityId, rationale: &str) -> Self {
        ScoreAccumulator {
            target,
            positive: 0.0,
            negative: 0.0,
            net: 0.0,
            rationale: rationale.to_string(),
        }
    }

    fn record(&mut self, contribution: f64, rationale: &str) {
        // Approximates "strongest path so far"; not a global maximum.
        if contribution.abs() > self.net.abs() && !rationale.trim().is_empty() {
            self.rationale = rationale.to_string();
        }
        if contribution >= 0.0 {
            self.positive += contribution;
        } else {
            self.negative -= contribution;
        }
        self.net += contribution;
    }

    fn direction(&self) -> ImpactDirection {
        if self.positive > 0.0 && self.negative > 0.0 {
            ImpactDirection::Mixed
        } else if self.positive >= self.negative {
            ImpactDirection::Positive
        } else {
            ImpactDirection::Negative
        }
    }
}

/// Accumulators in first-reached order, indexed by target id.
#[derive(Debug, Default)]
struct Scoreboard {
    index: HashMap<EntityId, usize>,
    slots: Vec<ScoreAccumulator>,
}

impl Scoreboard {
    fn slot(&mut self, target: EntityId, rationale: &str) -> &mut ScoreAccumulator {
        let position = *self.index.entry(target).or_insert_with(|| {
            self.slots.push(ScoreAccumulator::new(target, rationale));
            self.slots.len() - 1
        });
        &mut self.slots[position]
    }
}

#[derive(Debug, Clone)]
pub struct PropagationEngine {
    graph: Arc<KnowledgeGraph>,
}

impl PropagationEngine {
    pub fn new(graph: Arc<KnowledgeGraph>) -> Self {
        PropagationEngine { graph }
    }

    /// Score every entity reachable from `seeds` within [`MAX_DEPTH`] hops.
    ///
    /// Seeds are treated as a set. Results are sorted by descending score; equal scores
    /// keep the order in which their targets were first reached.
    pub fn propagate<'e, I>(&self, seeds: I) -> Vec<ImpactResult>
    where
        I: IntoIterator<Item = &'e Entity>,
    {
        let mut board = Scoreboard::default();
        let mut walked = HashSet::new();

        for seed in seeds {
            if walked.insert(seed.id) {
                self.walk(seed.id, 1, 1.0, &mut board);
            }
        }

        let mut results: Vec<ImpactResult> = board
            .slots
            .into_iter()
            .filter(|acc| acc.net != 0.0)
            .filter_map(|acc| {
                let entity = self.graph.entity(&acc.target)?.clone();
                Some(ImpactResult {
                    entity,
                    direction: acc.direction(),
                    score: acc.net.abs().min(1.0),
                    rationale: acc.rationale,
                })
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }

    fn walk(&self, source: EntityId, depth: usize, path_strength: f64, board: &mut Scoreboard) {
        if depth > MAX_DEPTH {
            return;
        }

        let decay = if depth == 1 { 1.0 } else { MULTI_HOP_DECAY };
        for link in self.graph.outgoing_links(&source) {
            let confidence = path_strength * link.strength() * decay;
            let contribution = match link.direction() {
                ImpactDirection::Positive => confidence,
                ImpactDirection::Negative => -confidence,
                ImpactDirection::Mixed => 0.0,
            };

            board
                .slot(link.target(), link.rationale())
                .record(contribution, link.rationale());

            self.walk(
                link.target(),
                depth + 1,
                path_strength * link.strength(),
                board,
            );
        }
    }
}
