//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod json_knowledge_adapter;
#[cfg(feature = "web")]
pub mod web;
