//! Knowledge graph of entities and directed causal links.
//!
//! The graph is populated once by a loader and then shared read-only, so it carries no
//! interior locking.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use super::entity::{Entity, EntityId, normalize};
use super::error::HeliosError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactDirection {
    Positive,
    Negative,
    Mixed,
}

impl ImpactDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactDirection::Positive => "positive",
            ImpactDirection::Negative => "negative",
            ImpactDirection::Mixed => "mixed",
        }
    }
}

impl FromStr for ImpactDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "POSITIVE" => Ok(ImpactDirection::Positive),
            "NEGATIVE" => Ok(ImpactDirection::Negative),
            "MIXED" => Ok(ImpactDirection::Mixed),
            other => Err(format!("unknown impact direction: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalLink {
    source: EntityId,
    target: EntityId,
    direction: ImpactDirection,
    strength: f64,
    rationale: String,
}

impl CausalLink {
    pub fn new(
        source: EntityId,
        target: EntityId,
        direction: ImpactDirection,
        strength: f64,
        rationale: impl Into<String>,
    ) -> Result<Self, HeliosError> {
        if !(0.0..=1.0).contains(&strength) {
            return Err(HeliosError::StrengthOutOfRange { strength });
        }
        Ok(CausalLink {
            source,
            target,
            direction,
            strength,
            rationale: rationale.into(),
        })
    }

    pub fn source(&self) -> EntityId {
        self.source
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn direction(&self) -> ImpactDirection {
        self.direction
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    entities: HashMap<EntityId, Entity>,
    registration_order: Vec<EntityId>,
    by_name: HashMap<String, EntityId>,
    outgoing: HashMap<EntityId, Vec<CausalLink>>,
    link_count: usize,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity under its canonical name and every alias.
    ///
    /// A key already claimed by another entity is taken over by this one.
    pub fn add_entity(&mut self, entity: Entity) {
        let id = entity.id;
        for key in entity.match_keys() {
            self.by_name.insert(key, id);
        }
        self.outgoing.entry(id).or_default();
        if self.entities.insert(id, entity).is_none() {
            self.registration_order.push(id);
        }
    }

    pub fn add_link(
        &mut self,
        source: &Entity,
        target: &Entity,
        direction: ImpactDirection,
        strength: f64,
        rationale: impl Into<String>,
    ) -> Result<(), HeliosError> {
        let link = CausalLink::new(source.id, target.id, direction, strength, rationale)?;
        for entity in [source, target] {
            if !self.entities.contains_key(&entity.id) {
                return Err(HeliosError::UnknownEntity {
                    name: entity.canonical_name.clone(),
                });
            }
        }
        self.outgoing.entry(source.id).or_default().push(link);
        self.link_count += 1;
        Ok(())
    }

    pub fn outgoing_links(&self, entity: &EntityId) -> &[CausalLink] {
        self.outgoing.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn find_by_canonical_name(&self, name: &str) -> Option<&Entity> {
        self.by_name
            .get(&normalize(name))
            .and_then(|id| self.entities.get(id))
    }

    /// Every entity whose name or alias appears in `text`, in registration order.
    ///
    /// Scans all keys; fine for a hand-curated graph of a few hundred names.
    pub fn find_entities_in_text(&self, text: &str) -> Vec<&Entity> {
        let haystack = normalize(text);
        let hits: HashSet<EntityId> = self
            .by_name
            .iter()
            .filter(|(key, _)| !key.is_empty() && haystack.contains(key.as_str()))
            .map(|(_, id)| *id)
            .collect();

        self.registration_order
            .iter()
            .filter(|id| hits.contains(id))
            .filter_map(|id| self.entities.get(id))
            .collect()
    }

    /// Entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.registration_order
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }
}

/// A loaded graph plus keyword phrases that point at its entities.
///
/// Keyword aliases are classifier hints ("rate hike" → Interest Rates) that are not
/// names of the entity itself.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub graph: KnowledgeGraph,
    pub keyword_aliases: BTreeMap<String, String>,
}
