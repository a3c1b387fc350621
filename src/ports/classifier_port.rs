//! Headline classification port.

use crate::domain::entity::Entity;
use crate::domain::event::EventType;

/// Turns raw headline text into an event type and the seed entities it mentions.
pub trait EventClassifier {
    fn classify(&self, text: &str) -> EventType;

    /// Entities mentioned by `text`, without duplicates, in a stable order.
    fn extract_entities(&self, text: &str) -> Vec<Entity>;
}
