//! Interaction timing windows.

use crate::{InputError, DEFAULT_CLICK_THRESHOLD_MS, DEFAULT_DOUBLE_TAP_MS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Press-to-release time below which a release is a click (ms).
    pub click_threshold_ms: u64,

    /// Maximum gap between two taps on one node for a double tap (ms).
    pub double_tap_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_threshold_ms: DEFAULT_CLICK_THRESHOLD_MS,
            double_tap_ms: DEFAULT_DOUBLE_TAP_MS,
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.click_threshold_ms == 0 {
            return Err(InputError::ZeroWindow {
                name: "click_threshold_ms",
            });
        }
        if self.double_tap_ms == 0 {
            return Err(InputError::ZeroWindow {
                name: "double_tap_ms",
            });
        }
        Ok(())
    }
}
