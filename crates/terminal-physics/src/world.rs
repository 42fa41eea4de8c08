//! Physics World: one rapier simulation holding a block per node.

use crate::boundary::{Boundaries, BoundaryLayout};
use crate::config::PhysicsConfig;
use crate::drag::DragConstraint;
use crate::sync::BodyPose;
use rapier2d::prelude::*;
use std::collections::HashMap;
use terminal_types::{Node, NodeId, Vec2, ViewportSize};
use tracing::{debug, info};

// =============================================================================
// NODE BODY
// =============================================================================

/// Binding between a node id and its dynamic body.
#[derive(Debug, Clone)]
struct NodeBody {
    id: NodeId,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

// =============================================================================
// PHYSICS WORLD
// =============================================================================

/// Live rigid-body simulation for one registry snapshot.
///
/// Mutation from the outside is limited to impulses, the drag constraint and
/// boundary placement; poses are read through [`PhysicsWorld::poses`].
pub struct PhysicsWorld {
    config: PhysicsConfig,
    viewport: ViewportSize,

    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    /// Node bodies in registry order
    nodes: Vec<NodeBody>,

    /// Quick lookup by id
    node_index: HashMap<NodeId, usize>,

    boundaries: Boundaries,
    drag: Option<DragConstraint>,

    steps: u64,
    disposed: bool,
}

impl PhysicsWorld {
    /// Build boundaries plus one dynamic block per node, spawned above the
    /// viewport at staggered heights. An empty node list is valid.
    pub fn initialize(nodes: &[Node], viewport: ViewportSize, config: PhysicsConfig) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let layout = BoundaryLayout::for_viewport(viewport, &config.boundary);
        let boundaries = Boundaries::create(layout, &mut bodies, &mut colliders);

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.step_seconds();
        // Pixel-scale world
        integration_parameters.length_unit = 100.0;

        let mut world = Self {
            gravity: vector![0.0, config.gravity],
            config,
            viewport,
            bodies,
            colliders,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            nodes: Vec::with_capacity(nodes.len()),
            node_index: HashMap::with_capacity(nodes.len()),
            boundaries,
            drag: None,
            steps: 0,
            disposed: false,
        };

        for (i, node) in nodes.iter().enumerate() {
            world.spawn_block(node.id.clone(), i, nodes.len());
        }

        info!(
            blocks = world.nodes.len(),
            width = viewport.width,
            height = viewport.height,
            "physics world initialized"
        );
        world
    }

    /// Spawn point for block `i` of `count`: spread across the width, above
    /// the top edge, each one higher than the last.
    pub fn spawn_position(
        config: &PhysicsConfig,
        viewport: ViewportSize,
        i: usize,
        count: usize,
    ) -> Vec2 {
        let x = viewport.width / (count as f32 + 1.0) * (i as f32 + 1.0);
        let y = -config.spawn.first_offset - i as f32 * config.spawn.stagger;
        Vec2::new(x, y)
    }

    fn spawn_block(&mut self, id: NodeId, i: usize, count: usize) {
        if self.node_index.contains_key(&id) {
            debug!(node = %id, "duplicate node id, block not spawned");
            return;
        }

        let spawn = Self::spawn_position(&self.config, self.viewport, i, count);
        let block = &self.config.block;
        let (hx, hy) = block.half_extents();
        let chamfer = block.chamfer.min(hx.min(hy) - 1.0).max(0.0);

        let idx = self.nodes.len();
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![spawn.x, spawn.y])
            .user_data(idx as u128)
            .build();
        let body = self.bodies.insert(body);

        let collider = ColliderBuilder::round_cuboid(hx - chamfer, hy - chamfer, chamfer)
            .restitution(block.restitution)
            .friction(block.friction)
            .density(block.density)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        self.node_index.insert(id.clone(), idx);
        self.nodes.push(NodeBody { id, body, collider });
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Advance the simulation by one fixed interval. No-op once disposed.
    pub fn step(&mut self) {
        if self.disposed {
            return;
        }

        if let Some(drag) = &self.drag {
            drag.apply(&mut self.bodies, self.integration_parameters.dt);
        }

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.steps += 1;
    }

    /// Remove every body and stop stepping. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.drag = None;
        let handles: Vec<RigidBodyHandle> = self
            .nodes
            .iter()
            .map(|n| n.body)
            .chain(self.boundaries.handles())
            .collect();
        for handle in handles {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.nodes.clear();
        self.node_index.clear();
        self.disposed = true;

        info!(steps = self.steps, "physics world disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Reposition boundaries for a new viewport. Dynamic blocks are left
    /// alone and settle against the new boundaries by themselves.
    pub fn on_resize(&mut self, viewport: ViewportSize) {
        if self.disposed {
            return;
        }

        self.viewport = viewport;
        let layout = BoundaryLayout::for_viewport(viewport, &self.config.boundary);
        if self
            .boundaries
            .apply(layout, &mut self.bodies, &mut self.colliders)
        {
            for node in &self.nodes {
                if let Some(rb) = self.bodies.get_mut(node.body) {
                    rb.wake_up(true);
                }
            }
            debug!(width = viewport.width, height = viewport.height, "boundaries moved");
        }
    }

    // =========================================================================
    // ACTIVATION FEEDBACK
    // =========================================================================

    /// Give the block a small upward hop and a spin. Returns false (and does
    /// nothing) when no live body carries `id`.
    pub fn apply_activation_impulse(&mut self, id: &NodeId) -> bool {
        let Some(handle) = self.body_handle(id) else {
            return false;
        };
        let Some(rb) = self.bodies.get_mut(handle) else {
            return false;
        };

        let activation = &self.config.activation;
        let linvel = *rb.linvel() + vector![0.0, -activation.hop_speed];
        rb.set_linvel(linvel, true);
        rb.set_angvel(activation.spin, true);
        debug!(node = %id, "activation impulse applied");
        true
    }

    // =========================================================================
    // DRAG
    // =========================================================================

    /// Attach the drag constraint to the block under `pos`, if any.
    pub fn begin_drag(&mut self, pos: Vec2) -> Option<NodeId> {
        let id = self.node_at(pos)?;
        let handle = self.body_handle(&id)?;
        let rb = self.bodies.get(handle)?;
        self.drag = Some(DragConstraint::attach(
            id.clone(),
            handle,
            rb,
            pos,
            self.config.drag.stiffness,
        ));
        Some(id)
    }

    pub fn move_drag(&mut self, pos: Vec2) {
        if let Some(drag) = &mut self.drag {
            drag.move_to(pos);
        }
    }

    /// Detach the drag constraint; returns the node that was being dragged.
    pub fn end_drag(&mut self) -> Option<NodeId> {
        self.drag.take().map(|drag| drag.node)
    }

    pub fn drag(&self) -> Option<&DragConstraint> {
        self.drag.as_ref()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Node whose block contains `pos`. Overlaps resolve to the first block
    /// in creation (registry) order.
    pub fn node_at(&self, pos: Vec2) -> Option<NodeId> {
        let point = point![pos.x, pos.y];
        self.nodes
            .iter()
            .find(|node| {
                self.colliders
                    .get(node.collider)
                    .is_some_and(|co| co.shape().contains_point(co.position(), &point))
            })
            .map(|node| node.id.clone())
    }

    /// Current pose of every block, in registry order.
    pub fn poses(&self) -> impl Iterator<Item = (&NodeId, BodyPose)> + '_ {
        self.nodes.iter().filter_map(|node| {
            let rb = self.bodies.get(node.body)?;
            let t = rb.translation();
            Some((
                &node.id,
                BodyPose {
                    position: Vec2::new(t.x, t.y),
                    angle: rb.rotation().angle(),
                },
            ))
        })
    }

    pub fn pose(&self, id: &NodeId) -> Option<BodyPose> {
        let rb = self.bodies.get(self.body_handle(id)?)?;
        let t = rb.translation();
        Some(BodyPose {
            position: Vec2::new(t.x, t.y),
            angle: rb.rotation().angle(),
        })
    }

    /// Velocity of a block (px/s).
    pub fn velocity(&self, id: &NodeId) -> Option<Vec2> {
        let rb = self.bodies.get(self.body_handle(id)?)?;
        let v = rb.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    /// Number of node blocks (boundaries excluded).
    pub fn block_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of bodies of any kind still in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn boundary_layout(&self) -> BoundaryLayout {
        self.boundaries.layout()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    fn body_handle(&self, id: &NodeId) -> Option<RigidBodyHandle> {
        self.node_index.get(id).map(|&idx| self.nodes[idx].body)
    }
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("viewport", &self.viewport)
            .field("blocks", &self.nodes.len())
            .field("steps", &self.steps)
            .field("disposed", &self.disposed)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terminal_types::NodeIcon;

    fn node(id: &str) -> Node {
        Node {
            id: NodeId::new(id),
            label: id.to_uppercase(),
            sub: String::new(),
            url: format!("https://{}.example", id),
            color: "#ffffff".to_string(),
            keywords: vec![id.to_string()],
            is_custom: false,
            icon: NodeIcon::default(),
        }
    }

    fn viewport() -> ViewportSize {
        ViewportSize::new(1000.0, 800.0)
    }

    fn settled_world(ids: &[&str]) -> PhysicsWorld {
        let nodes: Vec<Node> = ids.iter().map(|id| node(id)).collect();
        let mut world = PhysicsWorld::initialize(&nodes, viewport(), PhysicsConfig::default());
        for _ in 0..600 {
            world.step();
        }
        world
    }

    #[test]
    fn test_blocks_spawn_above_viewport_staggered() {
        let nodes = vec![node("a"), node("b"), node("c")];
        let world = PhysicsWorld::initialize(&nodes, viewport(), PhysicsConfig::default());

        let ys: Vec<f32> = world.poses().map(|(_, p)| p.position.y).collect();
        assert_eq!(ys.len(), 3);
        assert!(ys.iter().all(|y| *y < 0.0));
        assert!(ys[0] > ys[1] && ys[1] > ys[2]);

        let xs: Vec<f32> = world.poses().map(|(_, p)| p.position.x).collect();
        assert_eq!(xs, vec![250.0, 500.0, 750.0]);
    }

    #[test]
    fn test_empty_world_has_only_boundaries() {
        let mut world = PhysicsWorld::initialize(&[], viewport(), PhysicsConfig::default());
        world.step();
        assert_eq!(world.block_count(), 0);
        assert_eq!(world.body_count(), 3);
        assert!(world.node_at(Vec2::new(500.0, 400.0)).is_none());
    }

    #[test]
    fn test_blocks_fall_and_rest_on_floor() {
        let world = settled_world(&["a"]);
        let pose = world.pose(&NodeId::new("a")).unwrap();
        let floor = world.boundary_layout().floor;
        let floor_top = floor.center.y - floor.half_extents.y;

        assert!(pose.position.y > 0.0);
        assert!(pose.position.y < floor_top);
        assert!(floor_top - pose.position.y < 120.0);
    }

    #[test]
    fn test_hit_testing() {
        let world = settled_world(&["a"]);
        let center = world.pose(&NodeId::new("a")).unwrap().position;

        assert_eq!(world.node_at(center), Some(NodeId::new("a")));
        assert!(world.node_at(Vec2::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_activation_impulse_hops_block() {
        let mut world = settled_world(&["a"]);
        let id = NodeId::new("a");

        assert!(world.apply_activation_impulse(&id));
        assert!(world.velocity(&id).unwrap().y < -100.0);

        assert!(!world.apply_activation_impulse(&NodeId::new("missing")));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut world = settled_world(&["a", "b"]);
        world.dispose();
        assert!(world.is_disposed());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.poses().count(), 0);

        world.dispose();
        world.step();
        world.on_resize(ViewportSize::new(10.0, 10.0));
        assert_eq!(world.steps(), 600);
        assert!(!world.apply_activation_impulse(&NodeId::new("a")));
    }

    #[test]
    fn test_resize_moves_boundaries_not_blocks() {
        let mut world = settled_world(&["a"]);
        let id = NodeId::new("a");
        let before = world.pose(&id).unwrap();

        world.on_resize(ViewportSize::new(1400.0, 900.0));
        world.on_resize(ViewportSize::new(1400.0, 900.0));

        assert_eq!(world.pose(&id).unwrap(), before);
        let right = world.boundary_layout().right_wall;
        assert!((right.center.x - right.half_extents.x - 1400.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_pulls_block_towards_pointer() {
        let mut world = settled_world(&["a"]);
        let id = NodeId::new("a");
        let start = world.pose(&id).unwrap().position;

        assert_eq!(world.begin_drag(start), Some(id.clone()));
        let target = Vec2::new(start.x, start.y - 300.0);
        world.move_drag(target);
        for _ in 0..30 {
            world.step();
        }
        let lifted = world.pose(&id).unwrap().position;
        assert!(lifted.y < start.y - 100.0);

        assert_eq!(world.end_drag(), Some(id));
        assert!(world.drag().is_none());
    }

    #[test]
    fn test_corner_drag_stays_bounded() {
        let mut world = settled_world(&["a"]);
        let id = NodeId::new("a");
        let center = world.pose(&id).unwrap().position;

        let grab = center + Vec2::new(-80.0, -50.0);
        assert_eq!(world.begin_drag(grab), Some(id.clone()));
        let target = grab + Vec2::new(200.0, -250.0);
        world.move_drag(target);

        for _ in 0..240 {
            world.step();
            let pose = world.pose(&id).unwrap();
            assert!(pose.position.x.is_finite() && pose.position.y.is_finite());
            assert!(world.velocity(&id).unwrap().length() < 5_000.0);
        }

        // Hanging from the grab point: the center stays within the grab radius
        let pose = world.pose(&id).unwrap();
        let reach = Vec2::new(80.0, 50.0).length();
        assert!((pose.position - target).length() < reach + 10.0);
        assert_eq!(world.end_drag(), Some(id));
    }

    #[test]
    fn test_drag_on_empty_space_attaches_nothing() {
        let mut world = settled_world(&["a"]);
        assert!(world.begin_drag(Vec2::new(5.0, 5.0)).is_none());
        assert!(world.end_drag().is_none());
    }
}
