//! Knowledge base loading port.

use crate::domain::error::HeliosError;
use crate::domain::graph::KnowledgeBase;

pub trait KnowledgeSource {
    /// Build a fully validated knowledge base. Any dangling reference is an error.
    fn load(&self) -> Result<KnowledgeBase, HeliosError>;
}
