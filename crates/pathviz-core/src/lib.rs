//! **pathviz-core** — board model for the pathviz search visualizer.
//!
//! This crate provides the types shared by the rest of the workspace:
//! grid positions, cells with passability and endpoint roles, and the
//! fixed-size [`Grid`] a user paints obstacles on.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{Cell, Role};
pub use geom::Pos;
pub use grid::{Grid, GridError};
