//! Per-node double-tap detection for the touch surface.
//!
//! A single tap never activates, so it stays free for scrolling and other
//! gestures.

use std::collections::HashMap;
use terminal_types::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// Second tap inside the window: activate.
    DoubleTap(NodeId),
    /// Tap recorded; waits for a second one.
    FirstTap,
}

#[derive(Debug, Clone)]
pub struct DoubleTapTracker {
    /// Most recent unconsumed tap per node
    last_tap: HashMap<NodeId, u64>,
    window_ms: u64,
}

impl DoubleTapTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            last_tap: HashMap::new(),
            window_ms,
        }
    }

    /// Register a tap on `id` at `now_ms`.
    ///
    /// A confirmed double tap clears the stored timestamp, so a third tap
    /// starts a fresh pair instead of re-triggering.
    pub fn tap(&mut self, id: &NodeId, now_ms: u64) -> TapOutcome {
        if let Some(&last) = self.last_tap.get(id) {
            let delta = now_ms.saturating_sub(last);
            if now_ms > last && delta < self.window_ms {
                self.last_tap.remove(id);
                return TapOutcome::DoubleTap(id.clone());
            }
        }

        self.last_tap.insert(id.clone(), now_ms);
        TapOutcome::FirstTap
    }

    pub fn reset(&mut self) {
        self.last_tap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_quick_taps_activate() {
        let mut tracker = DoubleTapTracker::new(300);
        let a = NodeId::new("a");
        assert_eq!(tracker.tap(&a, 1_000), TapOutcome::FirstTap);
        assert_eq!(tracker.tap(&a, 1_250), TapOutcome::DoubleTap(a.clone()));
    }

    #[test]
    fn third_tap_does_not_retrigger() {
        let mut tracker = DoubleTapTracker::new(300);
        let a = NodeId::new("a");
        tracker.tap(&a, 1_000);
        assert_eq!(tracker.tap(&a, 1_100), TapOutcome::DoubleTap(a.clone()));
        assert_eq!(tracker.tap(&a, 1_150), TapOutcome::FirstTap);
        // ...but it does arm a new pair
        assert_eq!(tracker.tap(&a, 1_200), TapOutcome::DoubleTap(a.clone()));
    }

    #[test]
    fn taps_on_different_nodes_do_not_pair() {
        let mut tracker = DoubleTapTracker::new(300);
        let a = NodeId::new("a");
        let b = NodeId::new("b");
        tracker.tap(&a, 1_000);
        assert_eq!(tracker.tap(&b, 1_050), TapOutcome::FirstTap);
        assert_eq!(tracker.tap(&a, 1_100), TapOutcome::DoubleTap(a.clone()));
    }

    #[test]
    fn non_positive_delta_rearms() {
        let mut tracker = DoubleTapTracker::new(300);
        let a = NodeId::new("a");
        tracker.tap(&a, 1_000);
        assert_eq!(tracker.tap(&a, 1_000), TapOutcome::FirstTap);
        assert_eq!(tracker.tap(&a, 900), TapOutcome::FirstTap);
    }

    #[test]
    fn reset_forgets_taps() {
        let mut tracker = DoubleTapTracker::new(300);
        let a = NodeId::new("a");
        tracker.tap(&a, 1_000);
        tracker.reset();
        assert_eq!(tracker.tap(&a, 1_100), TapOutcome::FirstTap);
    }

    proptest! {
        #[test]
        fn double_tap_iff_delay_in_window(first in 1u64..1_000_000, delay in 0u64..1_000) {
            let mut tracker = DoubleTapTracker::new(300);
            let a = NodeId::new("a");
            tracker.tap(&a, first);
            let outcome = tracker.tap(&a, first + delay);
            if delay > 0 && delay < 300 {
                prop_assert_eq!(outcome, TapOutcome::DoubleTap(a));
            } else {
                prop_assert_eq!(outcome, TapOutcome::FirstTap);
            }
        }
    }
}
