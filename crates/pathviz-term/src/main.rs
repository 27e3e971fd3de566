//! Terminal A* visualizer.
//!
//! Run: cargo run --bin pathviz

use pathviz_mapgen::BoardConfig;

fn main() {
    if let Err(e) = pathviz_term::term::run(BoardConfig::default()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
