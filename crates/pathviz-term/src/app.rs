//! Visualizer state: board, engine, overlay and status line.

use std::time::Instant;

use pathviz_core::{Grid, Pos, Role};
use pathviz_mapgen::{BoardConfig, BoardGen};
use pathviz_paths::{Outcome, Pacing, PathSearchEngine, SearchEvent};
use rand::Rng;
use rand::rngs::ThreadRng;

const HELP: &str = "s/e: start/end  g: obstacles  space: run  q: quit";

/// A user request, already decoded from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Put the start on a random empty cell.
    PlaceStart,
    /// Put the end on a random empty cell.
    PlaceEnd,
    /// Clear the whole board.
    Reset,
    /// Scatter random obstacles.
    Scatter,
    /// Start the search.
    Run,
    /// Cancel the running search.
    Cancel,
    Faster,
    Slower,
    /// Make an empty cell an obstacle.
    Paint(Pos),
    /// Make an obstacle an empty cell.
    Erase(Pos),
    Quit,
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What to draw for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Obstacle,
    Start,
    End,
    Visited,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Visited,
    Path,
}

/// The visualizer.
pub struct App<R: Rng = ThreadRng> {
    grid: Grid,
    engine: PathSearchEngine,
    board_gen: BoardGen<R>,
    density: f64,
    marks: Vec<Mark>,
    status: String,
}

impl App<ThreadRng> {
    /// Create an app with a thread-local random generator.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_rng(config, rand::rng())
    }
}

impl<R: Rng> App<R> {
    pub fn with_rng(config: BoardConfig, rng: R) -> Self {
        let grid = config.new_grid();
        let marks = vec![Mark::None; grid.len()];
        Self {
            grid,
            engine: PathSearchEngine::new(Pacing::new(config.pacing_ms)),
            board_gen: BoardGen::new(rng),
            density: config.obstacle_density,
            marks,
            status: String::from(HELP),
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn engine(&self) -> &PathSearchEngine {
        &self.engine
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// What to draw at `p`. Endpoints win over overlay marks.
    pub fn glyph(&self, p: Pos) -> Glyph {
        let (Some(cell), Some(i)) = (self.grid.at(p), self.grid.index(p)) else {
            return Glyph::Empty;
        };
        match cell.role {
            Role::Start => return Glyph::Start,
            Role::End => return Glyph::End,
            Role::None => {}
        }
        if cell.is_obstacle() {
            return Glyph::Obstacle;
        }
        match self.marks[i] {
            Mark::None => Glyph::Empty,
            Mark::Visited => Glyph::Visited,
            Mark::Path => Glyph::Path,
        }
    }

    /// Carry out a command.
    pub fn apply(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Quit => return Flow::Quit,
            Command::Cancel => {
                if self.engine.cancel() {
                    self.status = String::from("Search cancelled");
                }
            }
            Command::Faster => self.engine.pacing_mut().faster(),
            Command::Slower => self.engine.pacing_mut().slower(),
            Command::Run => self.start_search(),
            edit if self.engine.is_running() => {
                log::debug!("ignoring {edit:?} while a search is running");
            }
            Command::PlaceStart => {
                self.clear_marks();
                match self.board_gen.place_start(&mut self.grid) {
                    Some(_) => self.show_help(),
                    None => self.status = String::from("No empty cell left for the start"),
                }
            }
            Command::PlaceEnd => {
                self.clear_marks();
                match self.board_gen.place_end(&mut self.grid) {
                    Some(_) => self.show_help(),
                    None => self.status = String::from("No empty cell left for the end"),
                }
            }
            Command::Reset => {
                self.grid.reset();
                self.clear_marks();
                self.show_help();
            }
            Command::Scatter => {
                self.clear_marks();
                self.board_gen.scatter_obstacles(&mut self.grid, self.density);
                self.show_help();
            }
            Command::Paint(p) => {
                if self.grid.set_obstacle(p) {
                    self.clear_marks();
                    self.show_help();
                }
            }
            Command::Erase(p) => {
                if self.grid.clear_obstacle(p) {
                    self.clear_marks();
                    self.show_help();
                }
            }
        }
        Flow::Continue
    }

    /// Advance the search if a step is due at `now`. Returns whether
    /// anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.engine.poll(now) {
            Some(event) => {
                self.record(event);
                true
            }
            None => false,
        }
    }

    fn start_search(&mut self) {
        if self.engine.is_running() {
            return;
        }
        match self.engine.start(&self.grid) {
            Ok(()) => {
                self.clear_marks();
                self.status = String::from("Searching...");
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn record(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Visited(p) => self.mark(p, Mark::Visited),
            SearchEvent::PathCell(p) => self.mark(p, Mark::Path),
            SearchEvent::Finished(Outcome::PathFound(path)) => {
                self.status = format!("Path found: {} steps", path.len() - 1);
            }
            SearchEvent::Finished(Outcome::NoPathExists) => {
                self.status = String::from("No path found!");
            }
        }
    }

    fn mark(&mut self, p: Pos, mark: Mark) {
        if let Some(i) = self.grid.index(p) {
            self.marks[i] = mark;
        }
    }

    fn clear_marks(&mut self) {
        self.marks.fill(Mark::None);
    }

    /// Any successful board edit makes the last result stale.
    fn show_help(&mut self) {
        self.status = String::from(HELP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app(rows: i32, cols: i32) -> App<StdRng> {
        let config = BoardConfig {
            rows,
            cols,
            ..BoardConfig::default()
        };
        App::with_rng(config, StdRng::seed_from_u64(7))
    }

    fn finish(app: &mut App<StdRng>) {
        let mut now = Instant::now();
        while app.engine().is_running() {
            app.tick(now);
            now += app.engine().pacing().interval();
        }
    }

    #[test]
    fn run_without_endpoints_reports_error() {
        let mut a = app(3, 3);
        a.apply(Command::Run);
        assert!(!a.engine().is_running());
        assert_eq!(a.status(), "search: missing endpoints: start is not set");
    }

    #[test]
    fn full_run_marks_path() {
        let mut a = app(1, 4);
        a.grid.set_start(Pos::new(0, 0)).unwrap();
        a.grid.set_end(Pos::new(0, 3)).unwrap();
        a.apply(Command::Run);
        assert!(a.engine().is_running());
        finish(&mut a);
        assert_eq!(a.status(), "Path found: 3 steps");
        assert_eq!(a.glyph(Pos::new(0, 0)), Glyph::Start);
        assert_eq!(a.glyph(Pos::new(0, 1)), Glyph::Path);
        assert_eq!(a.glyph(Pos::new(0, 2)), Glyph::Path);
        assert_eq!(a.glyph(Pos::new(0, 3)), Glyph::End);
    }

    #[test]
    fn board_edits_restore_help() {
        let mut a = app(1, 4);
        a.grid.set_start(Pos::new(0, 0)).unwrap();
        a.grid.set_end(Pos::new(0, 3)).unwrap();
        a.apply(Command::Run);
        finish(&mut a);
        assert_eq!(a.status(), "Path found: 3 steps");

        // Painting onto the start changes nothing.
        a.apply(Command::Paint(Pos::new(0, 0)));
        assert_eq!(a.status(), "Path found: 3 steps");
        a.apply(Command::Paint(Pos::new(0, 1)));
        assert_eq!(a.status(), HELP);
        assert_eq!(a.glyph(Pos::new(0, 2)), Glyph::Empty);

        a.apply(Command::Run);
        finish(&mut a);
        assert_eq!(a.status(), "No path found!");
        a.apply(Command::Erase(Pos::new(0, 1)));
        assert_eq!(a.status(), HELP);
    }

    #[test]
    fn failed_placement_is_cleared_by_reset() {
        let mut a = app(1, 1);
        a.apply(Command::PlaceStart);
        assert_eq!(a.status(), HELP);
        a.apply(Command::PlaceEnd);
        assert_eq!(a.status(), "No empty cell left for the end");
        a.apply(Command::Reset);
        assert_eq!(a.status(), HELP);
        assert_eq!(a.grid().start(), None);
    }

    #[test]
    fn blocked_run_reports_no_path() {
        let mut a = app(3, 3);
        a.grid.set_start(Pos::new(0, 0)).unwrap();
        a.grid.set_end(Pos::new(0, 2)).unwrap();
        for r in 0..3 {
            a.apply(Command::Paint(Pos::new(r, 1)));
        }
        a.apply(Command::Run);
        finish(&mut a);
        assert_eq!(a.status(), "No path found!");
        assert_eq!(a.glyph(Pos::new(1, 0)), Glyph::Visited);
        assert_eq!(a.glyph(Pos::new(1, 1)), Glyph::Obstacle);
    }

    #[test]
    fn edits_are_ignored_while_running() {
        let mut a = app(4, 4);
        a.apply(Command::PlaceStart);
        a.apply(Command::PlaceEnd);
        a.apply(Command::Run);
        let before = a.grid().clone();
        a.apply(Command::Reset);
        a.apply(Command::Scatter);
        assert_eq!(a.grid(), &before);

        a.apply(Command::Cancel);
        assert_eq!(a.status(), "Search cancelled");
        a.apply(Command::Reset);
        assert_eq!(a.grid().start(), None);
    }

    #[test]
    fn pace_keys_adjust_engine() {
        let mut a = app(2, 2);
        a.apply(Command::Faster);
        assert_eq!(a.engine().pacing().millis(), 50);
        a.apply(Command::Slower);
        a.apply(Command::Slower);
        assert_eq!(a.engine().pacing().millis(), 150);
    }

    #[test]
    fn paint_and_erase() {
        let mut a = app(2, 2);
        a.apply(Command::Paint(Pos::new(1, 1)));
        assert_eq!(a.glyph(Pos::new(1, 1)), Glyph::Obstacle);
        a.apply(Command::Erase(Pos::new(1, 1)));
        assert_eq!(a.glyph(Pos::new(1, 1)), Glyph::Empty);
        assert_eq!(a.apply(Command::Quit), Flow::Quit);
    }
}
