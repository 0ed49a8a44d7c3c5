use serde::{Deserialize, Serialize};

/// Gameplay tuning for projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub width: f32,
    pub height: f32,

    /// Horizontal speed in pixels per tick for locally fired projectiles.
    pub speed: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
            speed: 10.0,
        }
    }
}
