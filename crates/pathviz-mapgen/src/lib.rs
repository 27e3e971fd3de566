//! Board utilities for pathviz: board configuration, random obstacle
//! scatter and random endpoint placement.

pub mod config;
pub mod mapgen;

pub use config::BoardConfig;
pub use mapgen::BoardGen;
