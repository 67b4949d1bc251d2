//! Infinite-scroll trigger.
//!
//! A sentinel sits just after the last rendered item. When at least
//! `threshold` of it becomes visible inside the scroll viewport the trigger
//! asks the controller for the next page.

use super::controller::{ListController, PendingFetch};
use crate::remote::ListSource;

/// Share of the sentinel that must be visible to count as intersecting.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// A one-dimensional extent, in rows or pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub len: f64,
}

impl Span {
    pub fn new(start: f64, len: f64) -> Self {
        Self {
            start,
            len: len.max(0.0),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.len
    }
}

/// Fraction of `target` that lies inside `viewport`, in `0.0..=1.0`.
pub fn visible_ratio(target: Span, viewport: Span) -> f64 {
    if target.len == 0.0 {
        let inside = target.start >= viewport.start && target.start < viewport.end();
        return if inside { 1.0 } else { 0.0 };
    }
    let overlap = target.end().min(viewport.end()) - target.start.max(viewport.start);
    (overlap.max(0.0) / target.len).min(1.0)
}

/// Edge-triggered visibility observer for a list sentinel.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    threshold: f64,
    intersecting: bool,
    armed_for: Option<u64>,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            intersecting: false,
            armed_for: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    /// Record a visibility ratio. Returns true only on the transition into
    /// the intersecting state.
    pub fn observe(&mut self, ratio: f64) -> bool {
        let now = ratio > 0.0 && ratio >= self.threshold;
        let entered = now && !self.intersecting;
        self.intersecting = now;
        entered
    }

    /// Observe the sentinel of `controller`'s list and request the next page
    /// on entry, if the list has more and is not already loading.
    ///
    /// The observer re-arms whenever the list state changed since the last
    /// observation, so a sentinel that stays visible after a short page
    /// still pulls the following one.
    pub fn observe_list<S: ListSource>(
        &mut self,
        ratio: f64,
        controller: &ListController<S>,
    ) -> Option<PendingFetch<S>> {
        let revision = controller.revision();
        if self.armed_for != Some(revision) {
            self.intersecting = false;
            self.armed_for = Some(revision);
        }

        if !self.observe(ratio) {
            return None;
        }
        if !controller.state(|s| s.can_fetch_next()) {
            return None;
        }
        controller.fetch_next_page()
    }
}
