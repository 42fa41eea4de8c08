//! Pointer and touch interaction handling for the command terminal.
//!
//! Raw press/release and tap events are classified into exactly one of:
//!
//! ```text
//! mouse press ──► release ──┬─ elapsed < click threshold + hit ──► ClickActivation
//!                           ├─ elapsed < click threshold, no hit ─► Miss
//!                           └─ elapsed ≥ click threshold ─────────► Drag
//!
//! touch tap ──► hit ──┬─ second tap on same node within window ──► DoubleActivation
//!                     └─ otherwise ───────────────────────────────► SingleTap
//! ```
//!
//! Dragging itself is the physics world's business; this crate only decides
//! whether a release was a click. All timestamps are injected milliseconds so
//! every window is testable without sleeping.

mod config;
mod error;
mod handler;
mod pointer;
mod tap;

pub use config::InputConfig;
pub use error::InputError;
pub use handler::{Interaction, InteractionHandler};
pub use pointer::{PressClassifier, PressOutcome};
pub use tap::{DoubleTapTracker, TapOutcome};

use terminal_types::{NodeId, Vec2};

/// Default press-to-release time below which a release counts as a click (milliseconds).
pub const DEFAULT_CLICK_THRESHOLD_MS: u64 = 200;

/// Default window for two taps on the same node to count as a double tap (milliseconds).
pub const DEFAULT_DOUBLE_TAP_MS: u64 = 300;

/// Resolves a pointer position (in simulation coordinates) to a node.
pub trait HitTest {
    fn node_at(&self, pos: Vec2) -> Option<NodeId>;
}

impl<F> HitTest for F
where
    F: Fn(Vec2) -> Option<NodeId>,
{
    fn node_at(&self, pos: Vec2) -> Option<NodeId> {
        self(pos)
    }
}
