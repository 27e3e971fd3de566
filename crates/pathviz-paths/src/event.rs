//! Events a search emits, one per step.

use pathviz_core::Pos;

/// Terminal result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Shortest path, ordered from start to end inclusive.
    PathFound(Vec<Pos>),
    /// The open set ran dry before the goal was reached.
    NoPathExists,
}

impl Outcome {
    /// The path, if one was found.
    pub fn path(&self) -> Option<&[Pos]> {
        match self {
            Self::PathFound(path) => Some(path.as_slice()),
            Self::NoPathExists => None,
        }
    }
}

/// One observable step of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchEvent {
    /// A cell was moved to the closed set.
    Visited(Pos),
    /// An interior cell of the found path, reported while walking back from
    /// the goal towards the start.
    PathCell(Pos),
    /// The search is over. Always the last event.
    Finished(Outcome),
}

impl SearchEvent {
    /// Whether this is the last event of a run.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// The cell this event refers to, if any.
    #[inline]
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Self::Visited(p) | Self::PathCell(p) => Some(*p),
            Self::Finished(_) => None,
        }
    }
}
