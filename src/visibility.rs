use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::VISIBILITY_THRESHOLD;

/// One intersection observation of the hero region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    /// Entry for a region that is `ratio` visible.
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            intersection_ratio: ratio,
            is_intersecting: ratio > 0.0,
        }
    }
}

/// Decides "in view" from intersection batches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityGate {
    threshold: f64,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_in_view(&self, entry: &VisibilityEntry) -> bool {
        entry.is_intersecting && entry.intersection_ratio >= self.threshold
    }

    /// Evaluate a batch in order, forwarding each verdict to `forward`.
    pub fn dispatch(&self, entries: &[VisibilityEntry], mut forward: impl FnMut(bool)) {
        for entry in entries {
            let in_view = self.is_in_view(entry);
            trace!(ratio = entry.intersection_ratio, in_view, "visibility entry");
            forward(in_view);
        }
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(VISIBILITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let gate = VisibilityGate::default();
        assert!(gate.is_in_view(&VisibilityEntry::with_ratio(0.25)));
        assert!(gate.is_in_view(&VisibilityEntry::with_ratio(1.0)));
        assert!(!gate.is_in_view(&VisibilityEntry::with_ratio(0.2)));
        assert!(!gate.is_in_view(&VisibilityEntry::with_ratio(0.0)));
    }

    #[test]
    fn non_intersecting_entry_is_out_of_view() {
        let gate = VisibilityGate::new(0.0);
        let entry = VisibilityEntry {
            intersection_ratio: 0.0,
            is_intersecting: false,
        };
        assert!(!gate.is_in_view(&entry));
    }

    #[test]
    fn every_entry_is_forwarded_in_order() {
        let gate = VisibilityGate::default();
        let mut seen = Vec::new();
        gate.dispatch(
            &[
                VisibilityEntry::with_ratio(0.5),
                VisibilityEntry::with_ratio(0.1),
            ],
            |v| seen.push(v),
        );
        assert_eq!(seen, vec![true, false]);
    }
}
