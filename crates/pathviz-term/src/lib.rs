//! Crossterm front end for pathviz.
//!
//! [`App`] holds the board, the search engine and the visited/path overlay
//! and knows nothing about the terminal; [`term`] maps crossterm input onto
//! it and draws it.

pub mod app;
pub mod term;

pub use app::{App, Command, Flow, Glyph};
