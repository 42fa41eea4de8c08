//! Block surface: receives synced transforms and paints the node blocks.
//!
//! A node counts as mounted once it has been handed to [`BlockSurface::mount`];
//! the sync loop skips anything else.

use command_terminal::{ElementTransform, Node, NodeId, TransformSink, Vec2};
use egui::epaint::TextShape;
use egui::{Color32, FontId, Painter, Pos2, Stroke};
use std::collections::{HashMap, HashSet};

const FALLBACK_ACCENT: Color32 = Color32::from_rgb(0, 255, 65);

pub struct BlockSurface {
    size: Vec2,
    chamfer: f32,
    mounted: HashSet<NodeId>,
    transforms: HashMap<NodeId, ElementTransform>,
}

impl BlockSurface {
    pub fn new(size: Vec2, chamfer: f32) -> Self {
        Self {
            size,
            chamfer,
            mounted: HashSet::new(),
            transforms: HashMap::new(),
        }
    }

    /// Mount exactly `nodes`, forgetting transforms of anything unmounted.
    pub fn mount(&mut self, nodes: &[Node]) {
        self.mounted = nodes.iter().map(|n| n.id.clone()).collect();
        let mounted = &self.mounted;
        self.transforms.retain(|id, _| mounted.contains(id));
    }

    pub fn transform(&self, id: &NodeId) -> Option<&ElementTransform> {
        self.transforms.get(id)
    }

    /// Paint every node that has received a transform. `origin` is the
    /// screen position of simulation (0, 0).
    pub fn paint(&self, painter: &Painter, origin: Pos2, nodes: &[Node]) {
        for node in nodes {
            let Some(transform) = self.transforms.get(&node.id) else {
                continue;
            };
            let center = transform.center(self.size);
            let center = origin + egui::vec2(center.x, center.y);
            self.paint_block(painter, center, transform.rotation, node);
        }
    }

    fn paint_block(&self, painter: &Painter, center: Pos2, angle: f32, node: &Node) {
        let accent = parse_hex(&node.color).unwrap_or(FALLBACK_ACCENT);
        let (sin, cos) = angle.sin_cos();
        let rotate = |x: f32, y: f32| center + egui::vec2(x * cos - y * sin, x * sin + y * cos);

        let hx = self.size.x / 2.0;
        let hy = self.size.y / 2.0;
        let c = self.chamfer.min(hx.min(hy));
        let outline = vec![
            rotate(-hx + c, -hy),
            rotate(hx - c, -hy),
            rotate(hx, -hy + c),
            rotate(hx, hy - c),
            rotate(hx - c, hy),
            rotate(-hx + c, hy),
            rotate(-hx, hy - c),
            rotate(-hx, -hy + c),
        ];
        painter.add(egui::Shape::convex_polygon(
            outline,
            Color32::from_rgb(10, 10, 10),
            Stroke::new(2.0, accent),
        ));

        // Icon, label and sub stacked around the center
        let lines = [
            (node.icon.glyph().to_string(), FontId::proportional(22.0), accent, -30.0),
            (node.display_label(), FontId::monospace(14.0), Color32::WHITE, 0.0),
            (node.sub.clone(), FontId::monospace(11.0), Color32::GRAY, 24.0),
        ];
        for (text, font, color, dy) in lines {
            if text.is_empty() {
                continue;
            }
            let galley = painter.layout_no_wrap(text, font, color);
            let size = galley.size();
            let pos = rotate(-size.x / 2.0, dy - size.y / 2.0);
            painter.add(TextShape::new(pos, galley, color).with_angle(angle));
        }
    }
}

impl TransformSink for BlockSurface {
    fn element_size(&self, id: &NodeId) -> Option<Vec2> {
        self.mounted.contains(id).then_some(self.size)
    }

    fn write_transform(&mut self, id: &NodeId, transform: ElementTransform) {
        self.transforms.insert(id.clone(), transform);
    }
}

/// `#rrggbb` or `#rgb`.
fn parse_hex(color: &str) -> Option<Color32> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color32::from_rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}
