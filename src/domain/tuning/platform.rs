use serde::{Deserialize, Serialize};

/// How platforms are laid out when a world is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformLayout {
    /// Rejection-sampled positions with spacing constraints.
    Random,
    /// Fixed-size platforms stepping diagonally across the container.
    Series,
    /// No platforms; players only land on the floor.
    Empty,
}

/// Platform generation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub layout: PlatformLayout,
    pub count: usize,
    pub min_width: f32,
    pub max_width: f32,
    pub height: f32,

    /// Minimum clearance kept around every platform.
    pub min_gap: f32,

    /// Vertical spacing heuristic keeping stacked platforms reachable.
    pub max_vertical_gap: f32,

    /// Candidates drawn per platform before generation gives up.
    pub max_attempts: u32,

    /// Shared seed so every client builds the same layout; random when unset.
    pub seed: Option<u64>,

    // Series layout spacing.
    pub series_width: f32,
    pub series_step: f32,
    pub series_start_y: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            layout: PlatformLayout::Random,
            count: 5,
            min_width: 50.0,
            max_width: 150.0,
            height: 20.0,
            min_gap: 50.0,
            max_vertical_gap: 200.0,
            max_attempts: 10_000,
            seed: None,
            series_width: 100.0,
            series_step: 150.0,
            series_start_y: 100.0,
        }
    }
}
