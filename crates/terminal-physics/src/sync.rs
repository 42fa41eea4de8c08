//! Sync Loop: projects body poses onto visual element transforms.
//!
//! Strictly one-directional. Nothing here reads visual state back into the
//! simulation, and elements that are not mounted are skipped.

use terminal_types::{NodeId, Vec2};

/// Pose of a node body in simulation (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// Physical center of the body
    pub position: Vec2,
    /// Rotation in radians
    pub angle: f32,
}

/// Translate-then-rotate transform for a visual element whose origin is its
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTransform {
    pub translate: Vec2,
    pub rotation: f32,
}

impl ElementTransform {
    /// Align an element of `size` so its visual center sits on the body center.
    pub fn centered(pose: BodyPose, size: Vec2) -> Self {
        Self {
            translate: Vec2::new(pose.position.x - size.x / 2.0, pose.position.y - size.y / 2.0),
            rotation: pose.angle,
        }
    }

    /// Center of the element this transform places.
    pub fn center(&self, size: Vec2) -> Vec2 {
        Vec2::new(self.translate.x + size.x / 2.0, self.translate.y + size.y / 2.0)
    }
}

/// Receiver of element transforms (the host's visual layer).
pub trait TransformSink {
    /// Size of the mounted element for `id`, or `None` if it is not mounted.
    fn element_size(&self, id: &NodeId) -> Option<Vec2>;

    fn write_transform(&mut self, id: &NodeId, transform: ElementTransform);
}

/// Counts what the projection did; owns no application state.
#[derive(Debug, Default, Clone)]
pub struct SyncLoop {
    written: u64,
    skipped: u64,
}

impl SyncLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one transform per mounted element. Returns how many were written.
    pub fn project<'a>(
        &mut self,
        poses: impl IntoIterator<Item = (&'a NodeId, BodyPose)>,
        sink: &mut dyn TransformSink,
    ) -> usize {
        let mut written = 0;
        for (id, pose) in poses {
            match sink.element_size(id) {
                Some(size) => {
                    sink.write_transform(id, ElementTransform::centered(pose, size));
                    written += 1;
                }
                None => self.skipped += 1,
            }
        }
        self.written += written as u64;
        written
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
