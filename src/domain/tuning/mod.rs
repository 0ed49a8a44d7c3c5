// Immutable game configuration handed to every component at construction.

pub mod platform;
pub mod player;
pub mod projectile;

pub use platform::{PlatformLayout, PlatformTuning};
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Container dimensions plus per-entity tuning, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub container_width: f32,
    pub container_height: f32,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub platform: PlatformTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            container_width: 800.0,
            container_height: 600.0,
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            platform: PlatformTuning::default(),
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidContainer { width: f32, height: f32 },
    InvalidEntitySize { entity: &'static str },
    PlayerLargerThanContainer,
    InvalidPlatformWidths { min: f32, max: f32 },
    PlatformWiderThanContainer { max: f32 },
    InvalidGravity(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidContainer { width, height } => {
                write!(f, "container must be positive, got {width}x{height}")
            }
            ConfigError::InvalidEntitySize { entity } => {
                write!(f, "{entity} width and height must be positive")
            }
            ConfigError::PlayerLargerThanContainer => {
                write!(f, "player does not fit inside the container")
            }
            ConfigError::InvalidPlatformWidths { min, max } => {
                write!(f, "platform widths must satisfy 0 < min <= max, got {min}..{max}")
            }
            ConfigError::PlatformWiderThanContainer { max } => {
                write!(f, "max platform width {max} exceeds the container")
            }
            ConfigError::InvalidGravity(g) => write!(f, "gravity must be positive, got {g}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl GameConfig {
    pub fn with_container(mut self, width: f32, height: f32) -> Self {
        self.container_width = width;
        self.container_height = height;
        self
    }

    /// Checks the invariants the simulation relies on (bounded clamps, terminating sampling).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.container_width) || !positive(self.container_height) {
            return Err(ConfigError::InvalidContainer {
                width: self.container_width,
                height: self.container_height,
            });
        }
        if !positive(self.player.width) || !positive(self.player.height) {
            return Err(ConfigError::InvalidEntitySize { entity: "player" });
        }
        if !positive(self.projectile.width) || !positive(self.projectile.height) {
            return Err(ConfigError::InvalidEntitySize {
                entity: "projectile",
            });
        }
        if self.player.width > self.container_width || self.player.height > self.container_height
        {
            return Err(ConfigError::PlayerLargerThanContainer);
        }
        if !positive(self.player.gravity) {
            return Err(ConfigError::InvalidGravity(self.player.gravity));
        }

        let platform = &self.platform;
        if platform.layout != PlatformLayout::Empty {
            if !positive(platform.height) {
                return Err(ConfigError::InvalidEntitySize { entity: "platform" });
            }
            if !positive(platform.min_width) || platform.min_width > platform.max_width {
                return Err(ConfigError::InvalidPlatformWidths {
                    min: platform.min_width,
                    max: platform.max_width,
                });
            }
            if platform.max_width > self.container_width {
                return Err(ConfigError::PlatformWiderThanContainer {
                    max: platform.max_width,
                });
            }
        }
        Ok(())
    }

    /// Right-most x a player may occupy.
    pub fn player_max_x(&self) -> f32 {
        self.container_width - self.player.width
    }

    /// Lowest y a player may occupy outside a jump.
    pub fn player_max_y(&self) -> f32 {
        self.container_height - self.player.height
    }

    /// Resting y of a player standing on the container floor.
    pub fn ground_level(&self) -> f32 {
        self.container_height - self.player.height - self.player.ground_offset
    }
}

/// `max(min, min(max, value))`, tolerant of `min > max`.
pub fn clamp_position(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}
