//! Keyword-based headline classifier.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use super::entity::{Entity, EntityId, normalize};
use super::error::HeliosError;
use super::event::EventType;
use super::graph::KnowledgeGraph;
use crate::ports::classifier_port::EventClassifier;

const POLICY_KEYWORDS: &[&str] = &[
    "bank of england",
    "federal reserve",
    "ecb",
    "rate hike",
    "rates by",
    "cuts rates",
];
const EARNINGS_KEYWORDS: &[&str] = &["earnings", "guidance", "eps", "revenue beat", "quarter"];
const GEOPOLITICAL_KEYWORDS: &[&str] = &["tensions", "war", "sanctions", "conflict", "military"];

#[derive(Debug, Clone)]
pub struct RuleBasedClassifier {
    graph: Arc<KnowledgeGraph>,
    keyword_aliases: Vec<(String, EntityId)>,
}

impl RuleBasedClassifier {
    /// Resolve every keyword alias up front; an alias naming an unknown entity is a
    /// configuration error.
    pub fn new(
        graph: Arc<KnowledgeGraph>,
        keyword_aliases: &BTreeMap<String, String>,
    ) -> Result<Self, HeliosError> {
        let keyword_aliases = keyword_aliases
            .iter()
            .map(|(phrase, canonical)| {
                let id = graph
                    .find_by_canonical_name(canonical)
                    .map(|e| e.id)
                    .ok_or_else(|| HeliosError::UnknownEntity {
                        name: canonical.clone(),
                    })?;
                Ok((normalize(phrase), id))
            })
            .collect::<Result<Vec<_>, HeliosError>>()?;

        Ok(RuleBasedClassifier {
            graph,
            keyword_aliases,
        })
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl EventClassifier for RuleBasedClassifier {
    fn classify(&self, text: &str) -> EventType {
        let text = normalize(text);
        if contains_any(&text, POLICY_KEYWORDS) {
            EventType::Policy
        } else if contains_any(&text, EARNINGS_KEYWORDS) {
            EventType::Earnings
        } else if contains_any(&text, GEOPOLITICAL_KEYWORDS) {
            EventType::Geopolitical
        } else {
            EventType::Macro
        }
    }

    fn extract_entities(&self, text: &str) -> Vec<Entity> {
        let haystack = normalize(text);
        let mut seen = HashSet::new();
        let mut entities = Vec::new();

        let by_name = self.graph.find_entities_in_text(text).into_iter();
        let by_keyword = self
            .keyword_aliases
            .iter()
            .filter(|(phrase, _)| !phrase.is_empty() && haystack.contains(phrase.as_str()))
            .filter_map(|(_, id)| self.graph.entity(id));

        for entity in by_name.chain(by_keyword) {
            if seen.insert(entity.id) {
                entities.push(entity.clone());
            }
        }
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EntityType;

    fn classifier() -> RuleBasedClassifier {
        let mut graph = KnowledgeGraph::new();
        graph.add_entity(Entity::new(EntityType::PolicyActor, "Bank of England", ["boe"]));
        graph.add_entity(Entity::new(EntityType::MacroFactor, "Interest Rates", ["base rate"]));
        graph.add_entity(Entity::new(EntityType::Commodity, "Oil", ["crude"]));

        let aliases = BTreeMap::from([
            ("Rate Hike".to_string(), "Interest Rates".to_string()),
            ("cpi".to_string(), "interest rates".to_string()),
        ]);
        RuleBasedClassifier::new(Arc::new(graph), &aliases).unwrap()
    }

    #[test]
    fn policy_takes_precedence_over_other_keywords() {
        let c = classifier();
        assert_eq!(
            c.classify("Bank of England warns on war and earnings"),
            EventType::Policy
        );
    }

    #[test]
    fn classify_falls_through_categories() {
        let c = classifier();
        assert_eq!(c.classify("Tesco earnings beat"), EventType::Earnings);
        assert_eq!(c.classify("Sanctions widen"), EventType::Geopolitical);
        assert_eq!(c.classify("UK CPI at 3%"), EventType::Macro);
        assert_eq!(c.classify("Quiet day"), EventType::Macro);
    }

    #[test]
    fn extract_combines_names_and_keyword_aliases() {
        let c = classifier();
        let names: Vec<String> = c
            .extract_entities("BoE signals rate hike as crude climbs")
            .into_iter()
            .map(|e| e.canonical_name)
            .collect();
        assert_eq!(names, vec!["Bank of England", "Oil", "Interest Rates"]);
    }

    #[test]
    fn extract_deduplicates() {
        let c = classifier();
        let entities = c.extract_entities("base rate rise after CPI surprise; rate hike priced");
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].canonical_name, "Interest Rates");
    }

    #[test]
    fn unknown_alias_target_is_rejected() {
        let aliases = BTreeMap::from([("opec".to_string(), "Crude Futures".to_string())]);
        let err = RuleBasedClassifier::new(Arc::new(KnowledgeGraph::new()), &aliases).unwrap_err();
        assert!(matches!(err, HeliosError::UnknownEntity { .. }));
    }
}
