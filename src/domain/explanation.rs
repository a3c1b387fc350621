//! Plain-text rendering of an analysis.

use std::fmt::Write;

use super::event::Event;
use super::propagation::ImpactResult;

pub fn synthesize(event: &Event, impacts: &[ImpactResult]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Event: {}", event.raw_text);
    let _ = writeln!(out, "Classified as: {}", event.event_type);

    if impacts.is_empty() {
        out.push_str("No impacted entities were identified from the current causal map.\n");
        return out;
    }

    out.push_str("\nRanked impacts:\n");
    for (rank, impact) in impacts.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}: {} (confidence {:.2})",
            rank + 1,
            impact.entity.canonical_name,
            impact.direction.as_str(),
            impact.score
        );
        let _ = writeln!(out, "   Channel: {}", impact.rationale);
    }
    out
}
