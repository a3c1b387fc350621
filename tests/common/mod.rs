#![allow(dead_code)]

use helios::adapters::json_knowledge_adapter::JsonKnowledgeAdapter;
use helios::domain::analyzer::Analyzer;
use helios::domain::entity::{Entity, EntityType};
use helios::domain::graph::{ImpactDirection, KnowledgeBase, KnowledgeGraph};
use helios::domain::propagation::ImpactResult;
use helios::domain::trade::{TradeSide, TradeTicket};
use helios::ports::knowledge_port::KnowledgeSource;
use std::io::Write;

pub fn builtin_knowledge() -> KnowledgeBase {
    JsonKnowledgeAdapter::builtin()
        .load()
        .expect("built-in knowledge base loads")
}

pub fn builtin_analyzer() -> Analyzer {
    Analyzer::from_knowledge_base(builtin_knowledge()).expect("built-in analyzer builds")
}

/// Small graph builder keyed by canonical name.
pub struct GraphBuilder {
    graph: KnowledgeGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: KnowledgeGraph::new(),
        }
    }

    pub fn entity(mut self, entity_type: EntityType, name: &str) -> Self {
        self.graph
            .add_entity(Entity::new(entity_type, name, Vec::<String>::new()));
        self
    }

    pub fn sector(self, name: &str) -> Self {
        self.entity(EntityType::Sector, name)
    }

    pub fn link(mut self, from: &str, to: &str, direction: ImpactDirection, strength: f64) -> Self {
        let source = self.get(from);
        let target = self.get(to);
        self.graph
            .add_link(&source, &target, direction, strength, format!("{from} drives {to}"))
            .expect("valid link");
        self
    }

    pub fn get(&self, name: &str) -> Entity {
        self.graph
            .find_by_canonical_name(name)
            .cloned()
            .unwrap_or_else(|| panic!("entity {name} registered"))
    }

    pub fn build(self) -> KnowledgeGraph {
        self.graph
    }
}

pub fn find<'a>(results: &'a [ImpactResult], name: &str) -> Option<&'a ImpactResult> {
    results.iter().find(|r| r.entity.canonical_name == name)
}

pub fn buy(symbol: &str, quantity: i64, price: f64) -> TradeTicket {
    TradeTicket::new(symbol, TradeSide::Buy, quantity, price)
}

pub fn sell(symbol: &str, quantity: i64, price: f64) -> TradeTicket {
    TradeTicket::new(symbol, TradeSide::Sell, quantity, price)
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
