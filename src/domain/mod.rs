//! Core domain types and logic.

pub mod entity;
pub mod graph;
pub mod propagation;
pub mod event;
pub mod classifier;
pub mod explanation;
pub mod analyzer;
pub mod recommendation;
pub mod position;
pub mod trade;
pub mod portfolio;
pub mod ledger;
pub mod config_validation;
pub mod error;
