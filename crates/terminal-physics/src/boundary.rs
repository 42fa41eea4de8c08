//! Static boundary bodies: a floor and two side walls.
//!
//! The layout is a pure function of the viewport, so applying it again for
//! the same size is a no-op and resize storms need no debouncing.

use crate::config::BoundaryConfig;
use rapier2d::prelude::*;
use terminal_types::{Vec2, ViewportSize};

/// Center and half extents of one boundary rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Floor and wall placement for a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryLayout {
    pub floor: BoundaryRect,
    pub left_wall: BoundaryRect,
    pub right_wall: BoundaryRect,
}

impl BoundaryLayout {
    pub fn for_viewport(viewport: ViewportSize, config: &BoundaryConfig) -> Self {
        let t = config.thickness;
        let wall_half_height = viewport.height * config.wall_height_factor / 2.0;

        // Floor top edge sits `floor_inset` above the viewport bottom and spans
        // under both walls so corners never leak.
        let floor = BoundaryRect {
            center: Vec2::new(
                viewport.width / 2.0,
                viewport.height - config.floor_inset + t / 2.0,
            ),
            half_extents: Vec2::new(viewport.width / 2.0 + t, t / 2.0),
        };
        let left_wall = BoundaryRect {
            center: Vec2::new(-t / 2.0, viewport.height / 2.0),
            half_extents: Vec2::new(t / 2.0, wall_half_height),
        };
        let right_wall = BoundaryRect {
            center: Vec2::new(viewport.width + t / 2.0, viewport.height / 2.0),
            half_extents: Vec2::new(t / 2.0, wall_half_height),
        };

        Self {
            floor,
            left_wall,
            right_wall,
        }
    }

    fn rects(&self) -> [BoundaryRect; 3] {
        [self.floor, self.left_wall, self.right_wall]
    }
}

/// Handles of the boundary bodies living in a world.
#[derive(Debug, Clone)]
pub(crate) struct Boundaries {
    parts: [(RigidBodyHandle, ColliderHandle); 3],
    layout: BoundaryLayout,
}

impl Boundaries {
    pub(crate) fn create(
        layout: BoundaryLayout,
        bodies: &mut RigidBodySet,
        colliders: &mut ColliderSet,
    ) -> Self {
        let parts = layout.rects().map(|rect| {
            let body = RigidBodyBuilder::fixed()
                .translation(vector![rect.center.x, rect.center.y])
                .build();
            let handle = bodies.insert(body);
            let collider = ColliderBuilder::cuboid(rect.half_extents.x, rect.half_extents.y)
                .friction(1.0)
                .build();
            let collider_handle = colliders.insert_with_parent(collider, handle, bodies);
            (handle, collider_handle)
        });

        Self { parts, layout }
    }

    pub(crate) fn layout(&self) -> BoundaryLayout {
        self.layout
    }

    pub(crate) fn handles(&self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        self.parts.iter().map(|(body, _)| *body)
    }

    /// Move and resize the boundaries. Returns false when nothing changed.
    pub(crate) fn apply(
        &mut self,
        layout: BoundaryLayout,
        bodies: &mut RigidBodySet,
        colliders: &mut ColliderSet,
    ) -> bool {
        if layout == self.layout {
            return false;
        }

        for ((body, collider), rect) in self.parts.iter().zip(layout.rects()) {
            if let Some(rb) = bodies.get_mut(*body) {
                rb.set_translation(vector![rect.center.x, rect.center.y], true);
            }
            if let Some(co) = colliders.get_mut(*collider) {
                co.set_shape(SharedShape::cuboid(rect.half_extents.x, rect.half_extents.y));
            }
        }
        self.layout = layout;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_leaves_room_for_control_strip() {
        let config = BoundaryConfig::default();
        let layout = BoundaryLayout::for_viewport(ViewportSize::new(1000.0, 800.0), &config);

        let floor_top = layout.floor.center.y - layout.floor.half_extents.y;
        assert!((floor_top - (800.0 - config.floor_inset)).abs() < 1e-3);
        assert!(layout.floor.half_extents.x >= 500.0);
    }

    #[test]
    fn test_walls_sit_outside_viewport() {
        let config = BoundaryConfig::default();
        let layout = BoundaryLayout::for_viewport(ViewportSize::new(1000.0, 800.0), &config);

        let left_inner = layout.left_wall.center.x + layout.left_wall.half_extents.x;
        let right_inner = layout.right_wall.center.x - layout.right_wall.half_extents.x;
        assert!(left_inner.abs() < 1e-3);
        assert!((right_inner - 1000.0).abs() < 1e-3);
        // Tall enough to contain blocks dropped from far above
        assert!(layout.left_wall.half_extents.y * 2.0 >= 800.0 * 5.0);
    }

    #[test]
    fn test_apply_same_layout_is_noop() {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let config = BoundaryConfig::default();
        let layout = BoundaryLayout::for_viewport(ViewportSize::new(640.0, 480.0), &config);
        let mut boundaries = Boundaries::create(layout, &mut bodies, &mut colliders);

        assert!(!boundaries.apply(layout, &mut bodies, &mut colliders));

        let wider = BoundaryLayout::for_viewport(ViewportSize::new(900.0, 480.0), &config);
        assert!(boundaries.apply(wider, &mut bodies, &mut colliders));
        assert!(!boundaries.apply(wider, &mut bodies, &mut colliders));
        assert_eq!(boundaries.layout(), wider);
        assert_eq!(bodies.len(), 3);
    }
}
