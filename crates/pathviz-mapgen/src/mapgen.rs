//! Random board editing.
//!
//! - **Scatter**: turn each empty cell into an obstacle with a fixed chance.
//! - **Endpoint placement**: move the start or end role onto a uniformly
//!   chosen empty cell.

use pathviz_core::{Grid, Pos};
use rand::{Rng, RngExt};

/// Random board editor driven by `rng`.
pub struct BoardGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> BoardGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Turn each empty cell into an obstacle with probability `density`
    /// (clamped to 0.0–1.0). Obstacles and endpoints are left as they are.
    ///
    /// Returns the number of obstacles added.
    pub fn scatter_obstacles(&mut self, grid: &mut Grid, density: f64) -> usize {
        let density = density.clamp(0.0, 1.0);
        let empties: Vec<Pos> = empty_cells(grid).collect();
        let mut added = 0;
        for p in empties {
            let r: f64 = self.rng.random();
            if r < density && grid.set_obstacle(p) {
                added += 1;
            }
        }
        log::debug!("scattered {added} obstacles at density {density}");
        added
    }

    /// A uniformly chosen empty cell, or `None` if there is none.
    pub fn random_empty_cell(&mut self, grid: &Grid) -> Option<Pos> {
        let empties: Vec<Pos> = empty_cells(grid).collect();
        if empties.is_empty() {
            return None;
        }
        Some(empties[self.rng.random_range(0..empties.len())])
    }

    /// Move the start role onto a random empty cell.
    ///
    /// Returns the new start, or `None` (grid unchanged) when no empty cell
    /// is left.
    pub fn place_start(&mut self, grid: &mut Grid) -> Option<Pos> {
        let p = self.random_empty_cell(grid)?;
        grid.set_start(p).ok()?;
        Some(p)
    }

    /// Move the end role onto a random empty cell.
    pub fn place_end(&mut self, grid: &mut Grid) -> Option<Pos> {
        let p = self.random_empty_cell(grid)?;
        grid.set_end(p).ok()?;
        Some(p)
    }
}

fn empty_cells(grid: &Grid) -> impl Iterator<Item = Pos> + '_ {
    grid.iter().filter(|(_, c)| c.is_empty()).map(|(p, _)| p)
}
