//! Interaction Handler: one classification per pointer or touch gesture.

use crate::pointer::{PressClassifier, PressOutcome};
use crate::tap::{DoubleTapTracker, TapOutcome};
use crate::{HitTest, InputConfig};
use terminal_types::{NodeId, Vec2};

/// What a finished gesture amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Completed drag; the physics drag constraint already moved the block.
    Drag,
    /// First tap on a node; deliberately does nothing.
    SingleTap,
    /// Confirmed double tap on a node (touch surface).
    DoubleActivation(NodeId),
    /// Quick click on a node (pointer surface).
    ClickActivation(NodeId),
    /// Nothing under the pointer.
    Miss,
}

impl Interaction {
    /// Node to activate, if this interaction confirms one.
    pub fn activation(&self) -> Option<&NodeId> {
        match self {
            Interaction::DoubleActivation(id) | Interaction::ClickActivation(id) => Some(id),
            _ => None,
        }
    }
}

/// Ephemeral interaction state for one pointer device. Never persisted.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    press: PressClassifier,
    taps: DoubleTapTracker,
}

impl Default for InteractionHandler {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl InteractionHandler {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            press: PressClassifier::new(config.click_threshold_ms),
            taps: DoubleTapTracker::new(config.double_tap_ms),
        }
    }

    /// Pointer went down (mouse surface).
    pub fn pointer_down(&mut self, now_ms: u64) {
        self.press.press(now_ms);
    }

    pub fn is_pressed(&self) -> bool {
        self.press.is_pressed()
    }

    /// Pointer released (mouse surface).
    pub fn pointer_up(&mut self, now_ms: u64, pos: Vec2, hit: &dyn HitTest) -> Interaction {
        match self.press.release(now_ms, pos, hit) {
            PressOutcome::Click(id) => Interaction::ClickActivation(id),
            PressOutcome::DragEnded => Interaction::Drag,
            PressOutcome::Miss => Interaction::Miss,
        }
    }

    /// Tap on the touch surface.
    pub fn touch_tap(&mut self, now_ms: u64, pos: Vec2, hit: &dyn HitTest) -> Interaction {
        let Some(id) = hit.node_at(pos) else {
            return Interaction::Miss;
        };
        match self.taps.tap(&id, now_ms) {
            TapOutcome::DoubleTap(id) => Interaction::DoubleActivation(id),
            TapOutcome::FirstTap => Interaction::SingleTap,
        }
    }

    /// Drop all in-flight state (component teardown).
    pub fn reset(&mut self) {
        self.press.reset();
        self.taps.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_a(pos: Vec2) -> Option<NodeId> {
        (pos.x >= 0.0).then(|| NodeId::new("a"))
    }

    #[test]
    fn click_and_drag_paths() {
        let mut handler = InteractionHandler::default();

        handler.pointer_down(0);
        let click = handler.pointer_up(120, Vec2::new(1.0, 1.0), &on_a);
        assert_eq!(click.activation(), Some(&NodeId::new("a")));

        handler.pointer_down(1_000);
        assert_eq!(handler.pointer_up(1_450, Vec2::new(1.0, 1.0), &on_a), Interaction::Drag);

        handler.pointer_down(2_000);
        assert_eq!(handler.pointer_up(2_010, Vec2::new(-1.0, 1.0), &on_a), Interaction::Miss);
    }

    #[test]
    fn touch_needs_two_taps() {
        let mut handler = InteractionHandler::default();
        let pos = Vec2::new(1.0, 1.0);

        assert_eq!(handler.touch_tap(5_000, pos, &on_a), Interaction::SingleTap);
        assert_eq!(
            handler.touch_tap(5_200, pos, &on_a),
            Interaction::DoubleActivation(NodeId::new("a"))
        );
        assert_eq!(handler.touch_tap(5_210, Vec2::new(-1.0, 0.0), &on_a), Interaction::Miss);
    }

    #[test]
    fn reset_clears_press_and_taps() {
        let mut handler = InteractionHandler::default();
        handler.pointer_down(0);
        handler.touch_tap(0, Vec2::ZERO, &on_a);
        handler.reset();

        assert!(!handler.is_pressed());
        assert_eq!(handler.touch_tap(100, Vec2::ZERO, &on_a), Interaction::SingleTap);
    }
}
