use serde::{Deserialize, Serialize};

/// Gameplay tuning for player-controlled characters.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).
/// All velocities are in pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,

    /// Health a freshly spawned player starts with.
    pub default_health: i32,

    /// Horizontal (or downward) displacement applied per move intent.
    pub move_step: f32,

    /// Vertical velocity applied when a jump starts (negative is up).
    pub jump_velocity: f32,

    /// Added to vertical velocity on every airborne tick.
    pub gravity: f32,

    /// Distance kept between the player's feet and the container floor.
    pub ground_offset: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
            default_health: 3,
            move_step: 10.0,
            jump_velocity: -20.0,
            gravity: 0.5,
            ground_offset: 2.0,
        }
    }
}
