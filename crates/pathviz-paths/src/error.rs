use std::fmt;

use pathviz_core::Pos;

/// Why a pair of endpoints cannot be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointProblem {
    /// No start cell was given.
    StartUnset,
    /// No end cell was given.
    EndUnset,
    /// Start and end are the same cell.
    Coincident,
    /// The endpoint at this position is an obstacle.
    Blocked(Pos),
}

/// Errors that can occur when starting a search.
///
/// An exhausted search is not an error: it finishes with
/// [`Outcome::NoPathExists`](crate::Outcome::NoPathExists).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// Start or end is missing, coincident or sits on an obstacle.
    MissingEndpoints(EndpointProblem),
    /// A position lies outside the board.
    InvalidCoordinate(Pos),
    /// Another search is still running on the engine.
    Busy,
}

impl fmt::Display for EndpointProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartUnset => f.write_str("start is not set"),
            Self::EndUnset => f.write_str("end is not set"),
            Self::Coincident => f.write_str("start and end are the same cell"),
            Self::Blocked(p) => write!(f, "endpoint {p} is an obstacle"),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoints(why) => write!(f, "search: missing endpoints: {why}"),
            Self::InvalidCoordinate(p) => write!(f, "search: position {p} is outside the grid"),
            Self::Busy => f.write_str("search: a search is already running"),
        }
    }
}

impl std::error::Error for SearchError {}
