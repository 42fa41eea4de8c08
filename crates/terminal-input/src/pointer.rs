//! Drag vs. click disambiguation for the mouse/pointer surface.

use crate::HitTest;
use terminal_types::{NodeId, Vec2};

/// Result of classifying one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Quick release over a block.
    Click(NodeId),
    /// Held long enough to be a drag; never activates.
    DragEnded,
    /// Quick release over empty space, or a release without a press.
    Miss,
}

/// Remembers when the pointer went down.
#[derive(Debug, Clone)]
pub struct PressClassifier {
    press_started_at: Option<u64>,
    click_threshold_ms: u64,
}

impl PressClassifier {
    pub fn new(click_threshold_ms: u64) -> Self {
        Self {
            press_started_at: None,
            click_threshold_ms,
        }
    }

    pub fn press(&mut self, now_ms: u64) {
        self.press_started_at = Some(now_ms);
    }

    pub fn is_pressed(&self) -> bool {
        self.press_started_at.is_some()
    }

    /// Classify a release at `pos`. The hit test only runs for quick releases.
    pub fn release(&mut self, now_ms: u64, pos: Vec2, hit: &dyn HitTest) -> PressOutcome {
        let Some(started) = self.press_started_at.take() else {
            return PressOutcome::Miss;
        };

        let elapsed = now_ms.saturating_sub(started);
        if elapsed >= self.click_threshold_ms {
            return PressOutcome::DragEnded;
        }

        match hit.node_at(pos) {
            Some(id) => PressOutcome::Click(id),
            None => PressOutcome::Miss,
        }
    }

    pub fn reset(&mut self) {
        self.press_started_at = None;
    }
}
