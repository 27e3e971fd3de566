//! The [`Grid`] type — a fixed `rows × cols` board of [`Cell`]s.
//!
//! Dimensions are chosen once at construction. Cells are stored row-major,
//! so the flat index of `(row, col)` is `row * cols + col`. The grid tracks
//! at most one `Start` and one `End` cell and never lets either sit on an
//! obstacle.

use std::fmt;

use crate::cell::{Cell, Role};
use crate::geom::Pos;

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors returned by endpoint placement on a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// The position lies outside the grid.
    OutOfBounds(Pos),
    /// The target cell is an obstacle or already holds the other endpoint.
    Occupied(Pos),
    /// A stored grid has a cell count that does not match its dimensions.
    SizeMismatch { expected: usize, found: usize },
    /// A stored grid's endpoint fields disagree with its cell roles, or an
    /// endpoint sits on an obstacle.
    BadEndpoint(Role),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "grid: position {p} is out of bounds"),
            Self::Occupied(p) => write!(f, "grid: cell {p} is not empty"),
            Self::SizeMismatch { expected, found } => {
                write!(f, "grid: expected {expected} cells, found {found}")
            }
            Self::BadEndpoint(role) => write!(f, "grid: inconsistent {role:?} cell"),
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A fixed-size board of [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GridRepr", into = "GridRepr")
)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: i32,
    cols: i32,
    start: Option<Pos>,
    end: Option<Pos>,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with empty cells.
    /// Negative dimensions are treated as zero.
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Self {
            cells: vec![Cell::EMPTY; rows as usize * cols as usize],
            rows,
            cols,
            start: None,
            end: None,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.rows && p.col < self.cols
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(p.row as usize * self.cols as usize + p.col as usize)
    }

    /// Position of a flat index. The index must be below [`len`](Grid::len).
    #[inline]
    pub fn pos(&self, idx: usize) -> Pos {
        let cols = self.cols.max(1) as usize;
        Pos::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// Read the cell at `p`, or `None` if out of bounds.
    pub fn at(&self, p: Pos) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Whether `p` is inside the grid and not an obstacle.
    #[inline]
    pub fn is_passable(&self, p: Pos) -> bool {
        self.at(p).is_some_and(|c| c.passable)
    }

    /// The current start cell, if any.
    #[inline]
    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    /// The current end cell, if any.
    #[inline]
    pub fn end(&self) -> Option<Pos> {
        self.end
    }

    /// Turn an empty cell into an obstacle. Cells that are already
    /// obstacles, hold an endpoint or lie outside the grid are left alone.
    ///
    /// Returns whether the cell changed.
    pub fn set_obstacle(&mut self, p: Pos) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i].is_empty() => {
                self.cells[i] = Cell::OBSTACLE;
                true
            }
            _ => false,
        }
    }

    /// Turn an obstacle back into an empty cell. Returns whether the cell
    /// changed.
    pub fn clear_obstacle(&mut self, p: Pos) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i].is_obstacle() => {
                self.cells[i] = Cell::EMPTY;
                true
            }
            _ => false,
        }
    }

    /// Move the start role to `p`.
    pub fn set_start(&mut self, p: Pos) -> Result<(), GridError> {
        self.place(p, Role::Start)
    }

    /// Move the end role to `p`.
    pub fn set_end(&mut self, p: Pos) -> Result<(), GridError> {
        self.place(p, Role::End)
    }

    /// Remove the start role, if set.
    pub fn clear_start(&mut self) {
        if let Some(p) = self.start.take() {
            self.clear_role(p);
        }
    }

    /// Remove the end role, if set.
    pub fn clear_end(&mut self) {
        if let Some(p) = self.end.take() {
            self.clear_role(p);
        }
    }

    /// Return every cell to empty and clear both endpoints.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.start = None;
        self.end = None;
    }

    /// Number of passable cells.
    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.passable).count()
    }

    /// Row-major iterator over `(Pos, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.pos(i), c))
    }

    fn place(&mut self, p: Pos, role: Role) -> Result<(), GridError> {
        let i = self.index(p).ok_or(GridError::OutOfBounds(p))?;
        let cell = self.cells[i];
        if cell.role == role {
            return Ok(());
        }
        if !cell.is_empty() {
            return Err(GridError::Occupied(p));
        }
        let slot = match role {
            Role::Start => &mut self.start,
            Role::End => &mut self.end,
            Role::None => return Ok(()),
        };
        let previous = slot.replace(p);
        if let Some(prev) = previous {
            self.clear_role(prev);
        }
        self.cells[i] = Cell::EMPTY.with_role(role);
        Ok(())
    }

    fn clear_role(&mut self, p: Pos) {
        if let Some(i) = self.index(p) {
            self.cells[i].role = Role::None;
        }
    }
}

// ---------------------------------------------------------------------------
// Serialized form
// ---------------------------------------------------------------------------

/// Unchecked wire form of a [`Grid`]; converted back only after validation.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridRepr {
    cells: Vec<Cell>,
    rows: i32,
    cols: i32,
    start: Option<Pos>,
    end: Option<Pos>,
}

#[cfg(feature = "serde")]
impl From<Grid> for GridRepr {
    fn from(g: Grid) -> Self {
        Self {
            cells: g.cells,
            rows: g.rows,
            cols: g.cols,
            start: g.start,
            end: g.end,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<GridRepr> for Grid {
    type Error = GridError;

    fn try_from(r: GridRepr) -> Result<Self, GridError> {
        let expected = r.rows.max(0) as usize * r.cols.max(0) as usize;
        if r.rows < 0 || r.cols < 0 || r.cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                found: r.cells.len(),
            });
        }
        let grid = Grid {
            cells: r.cells,
            rows: r.rows,
            cols: r.cols,
            start: r.start,
            end: r.end,
        };
        for (role, slot) in [(Role::Start, grid.start), (Role::End, grid.end)] {
            let mut holders = grid.iter().filter(|(_, c)| c.role == role);
            let holder = holders.next();
            let consistent = holders.next().is_none()
                && match (holder, slot) {
                    (None, None) => true,
                    (Some((p, c)), Some(s)) => p == s && c.passable,
                    _ => false,
                };
            if !consistent {
                return Err(GridError::BadEndpoint(role));
            }
        }
        Ok(grid)
    }
}
