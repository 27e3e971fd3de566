use pathviz_core::Grid;

/// Settings for a visualizer board.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    pub rows: i32,
    pub cols: i32,
    /// Chance (0.0–1.0) that a scatter turns an empty cell into an obstacle.
    pub obstacle_density: f64,
    /// Milliseconds between animated search steps.
    pub pacing_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            obstacle_density: 0.3,
            pacing_ms: 100,
        }
    }
}

impl BoardConfig {
    /// A fresh empty grid of the configured size.
    pub fn new_grid(&self) -> Grid {
        Grid::new(self.rows, self.cols)
    }
}
