//! Command Terminal
//!
//! A launcher surface: labeled navigation nodes rendered as physics-driven
//! blocks that can be dragged, clicked, double-tapped, or activated by voice
//! and typed commands. Activation plays a short "hop" on the block and then
//! opens the node's destination.
//!
//! ## Data flow
//!
//! ```text
//! NodeRegistry ──► CommandIndex (derived, rebuilt on change)
//!      │
//!      └────────► SimulationSession ──► PhysicsWorld ──► SyncLoop ──► visual transforms
//!
//! pointer/touch ──► InteractionHandler ─┐
//! voice transcript ──► VoiceControl ────┼──► CommandDispatch::activate ──► impulse, then open url
//! typed text ──► submit (NAVIGATE) ─────┘
//! ```
//!
//! [`CommandTerminal`] wires everything together and is driven by the host
//! with millisecond timestamps; nothing in this crate blocks or sleeps.

pub mod command;
pub mod config;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod terminal;
pub mod voice;

pub use command::{
    resolve_navigation_query, resolve_transcript_or_text, BodyCommands, CommandDispatch,
    CommandIndex, InputMode, Navigator, SearchTemplate, Submission, RESET_COMMAND,
};
pub use config::{DispatchConfig, StorageConfig, TerminalConfig};
pub use error::{RegistryError, Result, TerminalError};
pub use registry::{FileStore, MemoryStore, NodeRegistry, NodeStore};
pub use scheduler::{FixedStepClock, TimerQueue};
pub use session::SimulationSession;
pub use terminal::{CommandTerminal, TickReport};
pub use voice::{SpeechEvent, SpeechRecognizer, SpeechSession, VoiceControl, VoiceState};

pub use terminal_input::{Interaction, InputConfig};
pub use terminal_physics::{ElementTransform, PhysicsConfig, TransformSink};
pub use terminal_types::{Node, NodeDraft, NodeIcon, NodeId, Vec2, ViewportSize};
