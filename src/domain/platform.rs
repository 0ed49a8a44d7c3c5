use crate::domain::player::Player;

/// Static platform; immutable after creation apart from removal.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    // Cosmetic only, e.g. "rgb(101, 67, 33)".
    pub color: String,
}

pub const DEFAULT_COLOR: &str = "rgb(101, 67, 33)";

impl Platform {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn overlaps_horizontally(&self, player: &Player) -> bool {
        player.x + player.width > self.x && player.x < self.x + self.width
    }

    pub fn straddles_top(&self, player: &Player) -> bool {
        player.y + player.height >= self.y && player.y < self.y + self.height
    }

    /// True when the player's feet crossed this platform's top edge within the current
    /// tick while descending.
    pub fn catches(&self, player: &Player) -> bool {
        self.overlaps_horizontally(player)
            && self.straddles_top(player)
            && player.dy >= 0.0
            && player.y + player.height <= self.y + player.dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::GameConfig;

    fn player_at(x: f32, y: f32, dy: f32) -> Player {
        let mut p = Player::new("p", x, y, &GameConfig::default());
        p.dy = dy;
        p
    }

    #[test]
    fn when_feet_crossed_top_this_tick_then_platform_catches() {
        let platform = Platform::new("a", 100.0, 300.0, 100.0, 20.0);
        // Feet at 305 after moving 8 this tick: crossed 300.
        let player = player_at(120.0, 275.0, 8.0);
        assert!(platform.catches(&player));
    }

    #[test]
    fn when_player_is_rising_then_platform_does_not_catch() {
        let platform = Platform::new("a", 100.0, 300.0, 100.0, 20.0);
        let player = player_at(120.0, 275.0, -4.0);
        assert!(!platform.catches(&player));
    }

    #[test]
    fn when_player_is_only_touching_side_then_platform_does_not_catch() {
        let platform = Platform::new("a", 100.0, 300.0, 100.0, 20.0);
        // Right edge exactly at platform's left edge.
        let player = player_at(70.0, 275.0, 8.0);
        assert!(!platform.catches(&player));
    }

    #[test]
    fn when_feet_sank_deeper_than_this_tick_then_platform_does_not_catch() {
        let platform = Platform::new("a", 100.0, 300.0, 100.0, 20.0);
        // Feet at 315 but only moved 2: was already below the top last tick.
        let player = player_at(120.0, 285.0, 2.0);
        assert!(!platform.catches(&player));
    }
}
