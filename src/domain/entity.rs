//! Economic entities participating in the causal graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable entity identity, derived from the canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Name-based id: the same canonical name (ignoring case and surrounding whitespace)
    /// always maps to the same id.
    pub fn from_name(canonical_name: &str) -> Self {
        EntityId(Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            normalize(canonical_name).as_bytes(),
        ))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    MacroFactor,
    Sector,
    Instrument,
    PolicyActor,
    Commodity,
    Currency,
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MACRO_FACTOR" => Ok(EntityType::MacroFactor),
            "SECTOR" => Ok(EntityType::Sector),
            "INSTRUMENT" => Ok(EntityType::Instrument),
            "POLICY_ACTOR" => Ok(EntityType::PolicyActor),
            "COMMODITY" => Ok(EntityType::Commodity),
            "CURRENCY" => Ok(EntityType::Currency),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub canonical_name: String,
    pub aliases: BTreeSet<String>,
}

impl Entity {
    pub fn new<I, S>(entity_type: EntityType, canonical_name: &str, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Entity {
            id: EntityId::from_name(canonical_name),
            entity_type,
            canonical_name: canonical_name.to_string(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Canonical name followed by every alias, all normalized.
    pub fn match_keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.canonical_name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .map(normalize)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name)
    }
}

/// Matching key for names, aliases and free text.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
