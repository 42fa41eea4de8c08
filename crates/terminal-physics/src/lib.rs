//! Command Terminal Physics
//!
//! Owns the 2-D rigid-body simulation behind the launcher: one falling block
//! per node, static boundaries sized to the viewport, a damped drag
//! constraint, and the one-way projection of body poses onto visual
//! transforms.
//!
//! # Usage
//! ```ignore
//! let mut world = PhysicsWorld::initialize(&nodes, viewport, PhysicsConfig::default());
//! let mut sync = SyncLoop::new();
//!
//! // Each simulation step:
//! world.step();
//! sync.project(world.poses(), &mut surface);
//! ```

pub mod boundary;
pub mod config;
pub mod drag;
pub mod sync;
pub mod world;

pub use boundary::{BoundaryLayout, BoundaryRect};
pub use config::{
    ActivationConfig, BlockConfig, BoundaryConfig, DragConfig, PhysicsConfig, SpawnConfig,
};
pub use drag::DragConstraint;
pub use sync::{BodyPose, ElementTransform, SyncLoop, TransformSink};
pub use world::PhysicsWorld;
