use pathviz_core::{Grid, Pos};

/// Read-only view of a board that a search can snapshot.
pub trait Board {
    /// Number of rows.
    fn rows(&self) -> i32;

    /// Number of columns.
    fn cols(&self) -> i32;

    /// Whether `p` is inside the board and not an obstacle.
    fn is_passable(&self, p: Pos) -> bool;

    /// The designated start cell, if the board tracks one.
    fn start(&self) -> Option<Pos> {
        None
    }

    /// The designated end cell, if the board tracks one.
    fn end(&self) -> Option<Pos> {
        None
    }
}

impl Board for Grid {
    fn rows(&self) -> i32 {
        Grid::rows(self)
    }

    fn cols(&self) -> i32 {
        Grid::cols(self)
    }

    fn is_passable(&self, p: Pos) -> bool {
        Grid::is_passable(self, p)
    }

    fn start(&self) -> Option<Pos> {
        Grid::start(self)
    }

    fn end(&self) -> Option<Pos> {
        Grid::end(self)
    }
}
