//! Simulation session: sole owner of the live physics world.
//!
//! Other components see the world only through [`BodyCommands`] and
//! [`HitTest`], plus the drag begin/move/end operations. A rebuild always
//! disposes the old world before the new one exists, so at most one world
//! ever writes transforms.

use crate::command::BodyCommands;
use terminal_input::HitTest;
use terminal_physics::{PhysicsConfig, PhysicsWorld, SyncLoop, TransformSink};
use terminal_types::{Node, NodeId, Vec2, ViewportSize};
use tracing::{debug, info};

#[derive(Debug)]
pub struct SimulationSession {
    config: PhysicsConfig,
    world: Option<PhysicsWorld>,
    sync: SyncLoop,
    generation: u64,
    impulses: u64,
}

impl SimulationSession {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            world: None,
            sync: SyncLoop::new(),
            generation: 0,
            impulses: 0,
        }
    }

    /// Replace the world with a fresh one for `nodes`.
    pub fn rebuild(&mut self, nodes: &[Node], viewport: ViewportSize) {
        self.dispose();
        self.world = Some(PhysicsWorld::initialize(nodes, viewport, self.config.clone()));
        self.generation += 1;
        info!(generation = self.generation, blocks = nodes.len(), "simulation rebuilt");
    }

    /// Tear down the live world. Safe to call any number of times.
    pub fn dispose(&mut self) {
        if let Some(mut world) = self.world.take() {
            world.dispose();
            debug!(generation = self.generation, "simulation disposed");
        }
    }

    pub fn is_live(&self) -> bool {
        self.world.is_some()
    }

    /// Advance one fixed step and project the result onto `sink`. Returns
    /// the number of transforms written.
    pub fn step(&mut self, sink: &mut dyn TransformSink) -> usize {
        let Some(world) = self.world.as_mut() else {
            return 0;
        };
        world.step();
        self.sync.project(world.poses(), sink)
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        if let Some(world) = self.world.as_mut() {
            world.on_resize(viewport);
        }
    }

    pub fn begin_drag(&mut self, pos: Vec2) -> Option<NodeId> {
        self.world.as_mut().and_then(|w| w.begin_drag(pos))
    }

    pub fn move_drag(&mut self, pos: Vec2) {
        if let Some(world) = self.world.as_mut() {
            world.move_drag(pos);
        }
    }

    pub fn end_drag(&mut self) -> Option<NodeId> {
        self.world.as_mut().and_then(|w| w.end_drag())
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    /// Incremented on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Feedback impulses that reached a live body.
    pub fn impulses(&self) -> u64 {
        self.impulses
    }

    pub fn sync(&self) -> &SyncLoop {
        &self.sync
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

impl BodyCommands for SimulationSession {
    fn apply_activation_impulse(&mut self, id: &NodeId) -> bool {
        let applied = self
            .world
            .as_mut()
            .is_some_and(|w| w.apply_activation_impulse(id));
        if applied {
            self.impulses += 1;
        }
        applied
    }
}

impl HitTest for SimulationSession {
    fn node_at(&self, pos: Vec2) -> Option<NodeId> {
        self.world.as_ref().and_then(|w| w.node_at(pos))
    }
}

impl Drop for SimulationSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
