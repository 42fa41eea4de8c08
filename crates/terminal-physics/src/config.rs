//! Tuning for the block simulation.
//!
//! Units are screen pixels and seconds, `y` pointing down.

use serde::{Deserialize, Serialize};

/// Complete physics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (px/s²)
    pub gravity: f32,

    /// Simulation steps per second, independent of the render rate
    pub step_hz: f32,

    pub block: BlockConfig,
    pub spawn: SpawnConfig,
    pub boundary: BoundaryConfig,
    pub activation: ActivationConfig,
    pub drag: DragConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            step_hz: 60.0,
            block: BlockConfig::default(),
            spawn: SpawnConfig::default(),
            boundary: BoundaryConfig::default(),
            activation: ActivationConfig::default(),
            drag: DragConfig::default(),
        }
    }
}

impl PhysicsConfig {
    /// Fixed simulation interval in seconds.
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.step_hz.max(1.0)
    }

    /// Fixed simulation interval in milliseconds.
    pub fn step_ms(&self) -> f64 {
        1000.0 / f64::from(self.step_hz.max(1.0))
    }
}

/// Shape and material of a node block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub width: f32,
    pub height: f32,
    /// Corner rounding radius
    pub chamfer: f32,
    /// Bounciness; below 1 so blocks settle
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 120.0,
            chamfer: 10.0,
            restitution: 0.6,
            friction: 0.5,
            density: 0.001,
        }
    }
}

impl BlockConfig {
    pub fn half_extents(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Where blocks appear before falling in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Height above the viewport top of the first block
    pub first_offset: f32,
    /// Extra height per subsequent block
    pub stagger: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            first_offset: 200.0,
            stagger: 100.0,
        }
    }
}

/// Floor and side walls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub thickness: f32,
    /// Space kept free below the floor for the control strip
    pub floor_inset: f32,
    /// Wall height as a multiple of the viewport height
    pub wall_height_factor: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            thickness: 60.0,
            floor_inset: 96.0,
            wall_height_factor: 5.0,
        }
    }
}

/// The "hop" played when a node is activated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Upward velocity change (px/s)
    pub hop_speed: f32,
    /// Angular velocity set on the block (rad/s)
    pub spin: f32,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            hop_speed: 420.0,
            spin: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Fraction of the pointer offset corrected per step (0..=1)
    pub stiffness: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { stiffness: 0.2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_interval() {
        let config = PhysicsConfig::default();
        assert!((config.step_seconds() - 1.0 / 60.0).abs() < 1e-6);
        assert!((config.step_ms() - 16.666).abs() < 0.01);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: PhysicsConfig = serde_json::from_str(r#"{"gravity": 500.0, "block": {"width": 200.0}}"#)
            .unwrap();
        assert_eq!(config.gravity, 500.0);
        assert_eq!(config.block.width, 200.0);
        assert_eq!(config.block.height, 120.0);
        assert_eq!(config.drag.stiffness, 0.2);
    }
}
