//! JSON knowledge base adapter.
//!
//! Reads the entity/link document, resolves every link endpoint and keyword alias by
//! name, and rejects the whole document on the first dangling reference.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::entity::{Entity, EntityType};
use crate::domain::error::HeliosError;
use crate::domain::graph::{ImpactDirection, KnowledgeBase, KnowledgeGraph};
use crate::ports::knowledge_port::KnowledgeSource;

/// The knowledge base shipped with the binary.
pub const BUILTIN_DOCUMENT: &str = include_str!("../../data/causal_graph.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GraphDocument {
    #[serde(default)]
    entities: Vec<EntityDocument>,
    #[serde(default)]
    links: Vec<LinkDocument>,
    #[serde(default)]
    keyword_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityDocument {
    canonical_name: String,
    #[serde(rename = "type")]
    entity_type: String,
    #[serde(default)]
    aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkDocument {
    source: String,
    target: String,
    direction: String,
    strength: f64,
    #[serde(default)]
    rationale: String,
}

enum Origin {
    File(PathBuf),
    Inline(String),
}

pub struct JsonKnowledgeAdapter {
    origin: Origin,
}

impl JsonKnowledgeAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        JsonKnowledgeAdapter {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_string(content: &str) -> Self {
        JsonKnowledgeAdapter {
            origin: Origin::Inline(content.to_string()),
        }
    }

    pub fn builtin() -> Self {
        Self::from_string(BUILTIN_DOCUMENT)
    }

    /// File adapter when a path is configured, otherwise the built-in document.
    pub fn from_optional_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    fn read(&self) -> Result<String, HeliosError> {
        match &self.origin {
            Origin::File(path) => Ok(std::fs::read_to_string(path)?),
            Origin::Inline(content) => Ok(content.clone()),
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::File(path) => path.display().to_string(),
            Origin::Inline(_) => "<built-in>".to_string(),
        }
    }
}

impl KnowledgeSource for JsonKnowledgeAdapter {
    fn load(&self) -> Result<KnowledgeBase, HeliosError> {
        let document: GraphDocument = serde_json::from_str(&self.read()?)?;
        let knowledge = build(document)?;
        info!(
            source = %self.describe(),
            entities = knowledge.graph.entity_count(),
            links = knowledge.graph.link_count(),
            "knowledge base loaded"
        );
        Ok(knowledge)
    }
}

fn build(document: GraphDocument) -> Result<KnowledgeBase, HeliosError> {
    let mut graph = KnowledgeGraph::new();

    for doc in document.entities {
        if doc.canonical_name.trim().is_empty() {
            return Err(HeliosError::KnowledgeBase {
                reason: "entity with blank canonicalName".into(),
            });
        }
        if graph.find_by_canonical_name(&doc.canonical_name).is_some() {
            return Err(HeliosError::KnowledgeBase {
                reason: format!("duplicate entity name or alias: {}", doc.canonical_name),
            });
        }
        let entity_type: EntityType = doc
            .entity_type
            .parse()
            .map_err(|reason| HeliosError::KnowledgeBase { reason })?;
        graph.add_entity(Entity::new(entity_type, doc.canonical_name.trim(), doc.aliases));
    }

    for doc in document.links {
        let source = resolve(&graph, &doc.source)?;
        let target = resolve(&graph, &doc.target)?;
        let direction: ImpactDirection = doc
            .direction
            .parse()
            .map_err(|reason| HeliosError::KnowledgeBase { reason })?;
        graph.add_link(&source, &target, direction, doc.strength, doc.rationale)?;
    }

    for canonical in document.keyword_aliases.values() {
        resolve(&graph, canonical)?;
    }

    Ok(KnowledgeBase {
        graph,
        keyword_aliases: document.keyword_aliases,
    })
}

fn resolve(graph: &KnowledgeGraph, name: &str) -> Result<Entity, HeliosError> {
    graph
        .find_by_canonical_name(name)
        .cloned()
        .ok_or_else(|| HeliosError::UnknownEntity {
            name: name.to_string(),
        })
}
