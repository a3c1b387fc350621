//! Headline analysis pipeline: classify, seed, propagate, explain.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::classifier::RuleBasedClassifier;
use super::error::HeliosError;
use super::event::Event;
use super::explanation::synthesize;
use super::graph::KnowledgeBase;
use super::propagation::{ImpactResult, PropagationEngine};
use crate::ports::classifier_port::EventClassifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub event: Event,
    pub ranked_impacts: Vec<ImpactResult>,
    pub explanation: String,
}

pub struct Analyzer {
    classifier: Box<dyn EventClassifier + Send + Sync>,
    engine: PropagationEngine,
}

impl Analyzer {
    pub fn new(
        classifier: Box<dyn EventClassifier + Send + Sync>,
        engine: PropagationEngine,
    ) -> Self {
        Analyzer { classifier, engine }
    }

    /// Wire the rule-based classifier and a propagation engine over one shared graph.
    pub fn from_knowledge_base(knowledge: KnowledgeBase) -> Result<Self, HeliosError> {
        let graph = Arc::new(knowledge.graph);
        let classifier = RuleBasedClassifier::new(Arc::clone(&graph), &knowledge.keyword_aliases)?;
        Ok(Analyzer::new(
            Box::new(classifier),
            PropagationEngine::new(graph),
        ))
    }

    pub fn analyze(&self, text: &str) -> AnalysisReport {
        let event = Event::new(self.classifier.classify(text), text);
        let seeds = self.classifier.extract_entities(text);
        let ranked_impacts = self.engine.propagate(&seeds);
        debug!(
            event_type = %event.event_type,
            seeds = seeds.len(),
            impacts = ranked_impacts.len(),
            "headline analyzed"
        );
        let explanation = synthesize(&event, &ranked_impacts);
        AnalysisReport {
            event,
            ranked_impacts,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Entity, EntityType};
    use crate::domain::event::EventType;
    use crate::domain::graph::{ImpactDirection, KnowledgeGraph};

    struct FixedClassifier(Vec<Entity>);

    impl EventClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> EventType {
            EventType::Earnings
        }

        fn extract_entities(&self, _text: &str) -> Vec<Entity> {
            self.0.clone()
        }
    }

    #[test]
    fn analyze_runs_injected_classifier_through_engine() {
        let tesco = Entity::new(EntityType::Instrument, "Tesco", Vec::<String>::new());
        let grocers = Entity::new(EntityType::Sector, "Grocers", Vec::<String>::new());
        let mut graph = KnowledgeGraph::new();
        graph.add_entity(tesco.clone());
        graph.add_entity(grocers.clone());
        graph
            .add_link(&tesco, &grocers, ImpactDirection::Positive, 0.5, "read-across")
            .unwrap();

        let analyzer = Analyzer::new(
            Box::new(FixedClassifier(vec![tesco])),
            PropagationEngine::new(Arc::new(graph)),
        );
        let report = analyzer.analyze("Tesco lifts guidance");

        assert_eq!(report.event.event_type, EventType::Earnings);
        assert_eq!(report.event.raw_text, "Tesco lifts guidance");
        assert_eq!(report.ranked_impacts.len(), 1);
        assert!(report.explanation.contains("1. Grocers: positive (confidence 0.50)"));
    }

    #[test]
    fn empty_knowledge_base_yields_empty_report() {
        let analyzer = Analyzer::from_knowledge_base(KnowledgeBase::default()).unwrap();
        let report = analyzer.analyze("Anything at all");
        assert!(report.ranked_impacts.is_empty());
        assert!(report.explanation.contains("No impacted entities"));
    }
}
