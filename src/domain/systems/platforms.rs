// Platform layout generation and landing resolution.

use crate::domain::events::EventBus;
use crate::domain::ids;
use crate::domain::platform::Platform;
use crate::domain::player::{LandingResolver, Player};
use crate::domain::tuning::{GameConfig, PlatformLayout, PlatformTuning};
use rand::Rng;
use std::fmt;
use tracing::debug;

/// Rejection sampling could not place every requested platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    pub requested: usize,
    pub placed: usize,
    pub attempts: u32,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "placed {} of {} platforms; gave up after {} attempts",
            self.placed, self.requested, self.attempts
        )
    }
}

impl std::error::Error for GenerationError {}

/// Axis-aligned footprint used while sampling candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// True when `candidate` sits too close to `other` on both axes.
///
/// Horizontally the footprints must be at least `min_gap` apart; vertically the candidate
/// must be at least `min_gap` above or `max_vertical_gap` below `other`.
pub fn conflicts(candidate: &Footprint, other: &Footprint, tuning: &PlatformTuning) -> bool {
    let h = tuning.height;
    let horizontal = candidate.x < other.x + other.width + tuning.min_gap
        && candidate.x + candidate.width + tuning.min_gap > other.x;
    let vertical = candidate.y < other.y + h + tuning.max_vertical_gap
        && candidate.y + h + tuning.min_gap > other.y;
    horizontal && vertical
}

fn random_color<R: Rng>(rng: &mut R) -> String {
    format!(
        "rgb({}, {}, {})",
        rng.random::<u8>(),
        rng.random::<u8>(),
        rng.random::<u8>()
    )
}

/// Rejection-samples `tuning.count` platforms that pairwise satisfy [`conflicts`] == false.
pub fn generate_random<R: Rng>(
    rng: &mut R,
    cfg: &GameConfig,
) -> Result<Vec<Platform>, GenerationError> {
    let tuning = &cfg.platform;
    let mut accepted: Vec<Footprint> = Vec::with_capacity(tuning.count);
    let mut platforms = Vec::with_capacity(tuning.count);

    for _ in 0..tuning.count {
        let mut placed = None;
        let mut attempts = 0;

        while attempts < tuning.max_attempts {
            attempts += 1;
            let width = rng.random_range(tuning.min_width..=tuning.max_width);
            let candidate = Footprint {
                x: rng.random_range(0.0..=(cfg.container_width - width)),
                y: rng.random_range(0.0..=cfg.container_height),
                width,
            };

            if !accepted.iter().any(|other| conflicts(&candidate, other, tuning)) {
                placed = Some(candidate);
                break;
            }
        }

        let Some(fp) = placed else {
            return Err(GenerationError {
                requested: tuning.count,
                placed: accepted.len(),
                attempts,
            });
        };

        debug!(x = fp.x, y = fp.y, width = fp.width, attempts, "platform placed");
        accepted.push(fp);
        platforms.push(
            Platform::new(ids::platform_id(), fp.x, fp.y, fp.width, tuning.height)
                .with_color(random_color(rng)),
        );
    }

    Ok(platforms)
}

/// Fixed-size platforms stepping down and to the right until the container edge.
pub fn generate_series(cfg: &GameConfig) -> Vec<Platform> {
    let tuning = &cfg.platform;
    let mut platforms = Vec::new();
    let (mut x, mut y) = (0.0, tuning.series_start_y);

    while y < cfg.container_height {
        platforms.push(Platform::new(
            ids::platform_id(),
            x,
            y,
            tuning.series_width,
            tuning.height,
        ));
        x += tuning.series_step;
        if x + tuning.series_width > cfg.container_width {
            break;
        }
        y += tuning.series_step;
    }

    platforms
}

/// Builds the configured layout.
pub fn generate<R: Rng>(rng: &mut R, cfg: &GameConfig) -> Result<Vec<Platform>, GenerationError> {
    match cfg.platform.layout {
        PlatformLayout::Random => generate_random(rng, cfg),
        PlatformLayout::Series => Ok(generate_series(cfg)),
        PlatformLayout::Empty => Ok(Vec::new()),
    }
}

/// Lands `player` on the first platform (in iteration order) that catches it.
pub fn resolve_landing<'a, I>(platforms: I, player: &mut Player, bus: &EventBus) -> bool
where
    I: IntoIterator<Item = &'a Platform>,
{
    for platform in platforms {
        if platform.catches(player) {
            debug!(player_id = %player.id, platform_id = %platform.id, "landed on platform");
            player.land_on(platform.y, bus);
            return true;
        }
    }

    player.is_on_ground = false;
    false
}

impl LandingResolver for [Platform] {
    fn resolve_landing(&self, player: &mut Player, bus: &EventBus) -> bool {
        resolve_landing(self.iter(), player, bus)
    }
}
