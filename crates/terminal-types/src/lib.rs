//! Command Terminal Types
//!
//! Shared types for every boundary of the command terminal: the node registry,
//! the physics world, the interaction handler and the host UI all speak in
//! these types. The node id is the single binding between a node, its physics
//! body, its visual element and its persisted record.

mod geometry;
mod node;

pub use geometry::{Vec2, ViewportSize};
pub use node::{Node, NodeDraft, NodeIcon, NodeId};
