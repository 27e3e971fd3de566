//! Incremental A* search.
//!
//! A [`Search`] is an iterator: every call to `next` performs one step of
//! the algorithm and returns the event describing it. Callers that animate
//! the search sleep (or schedule a timer) between calls; callers that only
//! want the answer use [`Search::run_to_end`] or [`run`].

use std::iter::FusedIterator;

use pathviz_core::Pos;

use crate::distance::manhattan;
use crate::error::{EndpointProblem, SearchError};
use crate::event::{Outcome, SearchEvent};
use crate::neighbors::Neighbors;
use crate::traits::Board;

/// Sentinel score for cells the search has not reached.
pub(crate) const UNREACHABLE: i32 = i32::MAX;

const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Arena helpers
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Dims {
    rows: i32,
    cols: i32,
}

impl Dims {
    #[inline]
    fn len(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline]
    fn idx(self, p: Pos) -> Option<usize> {
        if p.row < 0 || p.col < 0 || p.row >= self.rows || p.col >= self.cols {
            return None;
        }
        Some(p.row as usize * self.cols as usize + p.col as usize)
    }

    #[inline]
    fn pos(self, idx: usize) -> Pos {
        let cols = self.cols as usize;
        Pos::new((idx / cols) as i32, (idx % cols) as i32)
    }
}

#[derive(Clone)]
struct Node {
    g: i32,
    f: i32,
    parent: usize,
    open: bool,
    closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            f: UNREACHABLE,
            parent: NO_PARENT,
            open: false,
            closed: false,
        }
    }
}

/// Everything a search in flight owns. Dropped as soon as the search
/// leaves the expanding phase.
struct State {
    passable: Vec<bool>,
    nodes: Vec<Node>,
    /// Open list in insertion order, re-sorted (stably) by `f` every step.
    open: Vec<usize>,
    nbuf: Neighbors,
}

enum Expansion {
    Visited(Pos),
    Reached(Vec<Pos>),
    Exhausted,
}

impl State {
    fn expand(&mut self, dims: Dims, goal: Pos) -> Expansion {
        if self.open.is_empty() {
            return Expansion::Exhausted;
        }

        // Stable: equal f keeps list order, so the first inserted wins.
        let nodes = &self.nodes;
        self.open.sort_by_key(|&i| nodes[i].f);
        let ci = self.open.remove(0);
        self.nodes[ci].open = false;

        let current = dims.pos(ci);
        if current == goal {
            return Expansion::Reached(self.trace(dims, ci));
        }

        self.nodes[ci].closed = true;
        let tentative_g = self.nodes[ci].g + 1;

        let passable = &self.passable;
        let neighbors = self
            .nbuf
            .cardinal(current, |n| dims.idx(n).is_some_and(|i| passable[i]));

        for &np in neighbors {
            let Some(ni) = dims.idx(np) else {
                continue;
            };
            let n = &mut self.nodes[ni];
            if n.closed || tentative_g >= n.g {
                continue;
            }
            n.parent = ci;
            n.g = tentative_g;
            n.f = tentative_g + manhattan(np, goal);
            if !n.open {
                n.open = true;
                self.open.push(ni);
            }
        }

        Expansion::Visited(current)
    }

    fn trace(&self, dims: Dims, goal_idx: usize) -> Vec<Pos> {
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != NO_PARENT {
            path.push(dims.pos(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        path
    }
}

enum Phase {
    Expanding(State),
    /// Reporting interior path cells from `path[next]` down to `path[1]`.
    Tracing { path: Vec<Pos>, next: usize },
    Done(Outcome),
    Cancelled,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A single A* run from `start` to `goal`, advanced one step at a time.
///
/// The board's passability is copied at construction, so the search holds
/// no borrow of it. [`cancel`](Search::cancel) (or dropping the `Search`)
/// abandons it.
pub struct Search {
    dims: Dims,
    start: Pos,
    goal: Pos,
    phase: Phase,
    visited: usize,
}

/// Everything a search produced, from its first step to its terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Every event in emission order, ending with [`SearchEvent::Finished`].
    pub events: Vec<SearchEvent>,
    pub outcome: Outcome,
}

impl Search {
    /// Prepare a search on `board` between the given endpoints.
    ///
    /// Fails with [`SearchError::MissingEndpoints`] when an endpoint is
    /// unset, both are the same cell, or one is an obstacle, and with
    /// [`SearchError::InvalidCoordinate`] when one lies outside the board.
    pub fn new<B: Board + ?Sized>(
        board: &B,
        start: Option<Pos>,
        end: Option<Pos>,
    ) -> Result<Self, SearchError> {
        let start = start.ok_or(SearchError::MissingEndpoints(EndpointProblem::StartUnset))?;
        let goal = end.ok_or(SearchError::MissingEndpoints(EndpointProblem::EndUnset))?;

        let dims = Dims {
            rows: board.rows().max(0),
            cols: board.cols().max(0),
        };
        let start_idx = dims.idx(start).ok_or(SearchError::InvalidCoordinate(start))?;
        dims.idx(goal).ok_or(SearchError::InvalidCoordinate(goal))?;

        if start == goal {
            return Err(SearchError::MissingEndpoints(EndpointProblem::Coincident));
        }
        for p in [start, goal] {
            if !board.is_passable(p) {
                return Err(SearchError::MissingEndpoints(EndpointProblem::Blocked(p)));
            }
        }

        let passable: Vec<bool> = (0..dims.len())
            .map(|i| board.is_passable(dims.pos(i)))
            .collect();
        let mut nodes = vec![Node::default(); dims.len()];
        {
            let node = &mut nodes[start_idx];
            node.g = 0;
            node.f = manhattan(start, goal);
            node.open = true;
        }

        log::debug!(
            "search {start} -> {goal} on {}x{} board",
            dims.rows,
            dims.cols
        );

        Ok(Self {
            dims,
            start,
            goal,
            phase: Phase::Expanding(State {
                passable,
                nodes,
                open: vec![start_idx],
                nbuf: Neighbors::new(),
            }),
            visited: 0,
        })
    }

    /// Prepare a search between the board's own start and end cells.
    pub fn from_board<B: Board + ?Sized>(board: &B) -> Result<Self, SearchError> {
        Self::new(board, board.start(), board.end())
    }

    #[inline]
    pub fn start(&self) -> Pos {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Pos {
        self.goal
    }

    /// Number of `Visited` events emitted so far.
    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited
    }

    /// Whether the terminal event has been emitted.
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Whether the search was cancelled before finishing.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.phase, Phase::Cancelled)
    }

    /// Abandon the search between steps. The open/closed sets and any
    /// pending path are dropped and no further events are produced.
    /// No effect once the search has finished.
    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Expanding(_) | Phase::Tracing { .. }) {
            log::debug!(
                "search {} -> {} cancelled after {} visits",
                self.start,
                self.goal,
                self.visited
            );
            self.phase = Phase::Cancelled;
        }
    }

    /// The outcome, once finished.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.phase {
            Phase::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Advance by one step. Returns `None` once the search has finished.
    pub fn step(&mut self) -> Option<SearchEvent> {
        let event = match &mut self.phase {
            Phase::Expanding(state) => match state.expand(self.dims, self.goal) {
                Expansion::Visited(p) => {
                    self.visited += 1;
                    log::trace!("visited {p}");
                    SearchEvent::Visited(p)
                }
                Expansion::Reached(path) => {
                    let next = path.len() - 2;
                    self.phase = Phase::Tracing { path, next };
                    return self.step();
                }
                Expansion::Exhausted => self.finish(Outcome::NoPathExists),
            },
            Phase::Tracing { path, next } => {
                if *next == 0 {
                    let path = std::mem::take(path);
                    self.finish(Outcome::PathFound(path))
                } else {
                    let p = path[*next];
                    *next -= 1;
                    SearchEvent::PathCell(p)
                }
            }
            Phase::Done(_) | Phase::Cancelled => return None,
        };
        Some(event)
    }

    /// Drive the search to completion, collecting every remaining event.
    ///
    /// Returns `None` for a cancelled search, which has no outcome.
    pub fn run_to_end(mut self) -> Option<Run> {
        let mut events = Vec::new();
        while let Some(ev) = self.step() {
            events.push(ev);
        }
        let outcome = self.outcome()?.clone();
        Some(Run { events, outcome })
    }

    fn finish(&mut self, outcome: Outcome) -> SearchEvent {
        match &outcome {
            Outcome::PathFound(path) => log::debug!(
                "search {} -> {} found a {}-cell path after {} visits",
                self.start,
                self.goal,
                path.len(),
                self.visited
            ),
            Outcome::NoPathExists => log::debug!(
                "search {} -> {} exhausted after {} visits",
                self.start,
                self.goal,
                self.visited
            ),
        }
        self.phase = Phase::Done(outcome.clone());
        SearchEvent::Finished(outcome)
    }
}

impl Iterator for Search {
    type Item = SearchEvent;

    #[inline]
    fn next(&mut self) -> Option<SearchEvent> {
        self.step()
    }
}

impl FusedIterator for Search {}

/// Run a search to completion without pacing.
pub fn run<B: Board + ?Sized>(
    board: &B,
    start: Option<Pos>,
    end: Option<Pos>,
) -> Result<Run, SearchError> {
    let Some(run) = Search::new(board, start, end)?.run_to_end() else {
        unreachable!("a search nobody cancelled always finishes");
    };
    Ok(run)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use pathviz_core::Grid;

    fn board(rows: i32, cols: i32, walls: &[(i32, i32)]) -> Grid {
        let mut g = Grid::new(rows, cols);
        for &(r, c) in walls {
            g.set_obstacle(Pos::new(r, c));
        }
        g
    }

    fn search(g: &Grid, s: (i32, i32), e: (i32, i32)) -> Run {
        run(g, Some(s.into()), Some(e.into())).unwrap()
    }

    fn visited(run: &Run) -> Vec<Pos> {
        run.events
            .iter()
            .filter_map(|ev| match ev {
                SearchEvent::Visited(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn reachable(g: &Grid, from: Pos) -> HashSet<Pos> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(p) = queue.pop_front() {
            for n in p.neighbors_4() {
                if g.is_passable(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    #[test]
    fn empty_grid_path_length_is_manhattan() {
        let g = board(4, 5, &[]);
        for s in g.iter().map(|(p, _)| p) {
            for e in g.iter().map(|(p, _)| p) {
                if s == e {
                    continue;
                }
                let run = run(&g, Some(s), Some(e)).unwrap();
                let path = run.outcome.path().unwrap();
                assert_eq!(path.len() as i32, manhattan(s, e) + 1, "{s} -> {e}");
                assert_eq!(path.first(), Some(&s));
                assert_eq!(path.last(), Some(&e));
                for w in path.windows(2) {
                    assert_eq!(manhattan(w[0], w[1]), 1);
                }
            }
        }
    }

    #[test]
    fn five_by_five_corner_to_corner() {
        let g = board(5, 5, &[]);
        let run = search(&g, (0, 0), (4, 4));
        let path = run.outcome.path().unwrap();
        assert_eq!(path.len(), 9);
        assert!(visited(&run).len() >= 9);
        for w in path.windows(2) {
            assert!(w[1].sum() > w[0].sum());
        }
    }

    #[test]
    fn tie_break_follows_insertion_order() {
        let g = board(2, 2, &[]);
        let run = search(&g, (0, 0), (1, 1));
        let path = vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1)];
        assert_eq!(
            run.events,
            vec![
                SearchEvent::Visited(Pos::new(0, 0)),
                SearchEvent::Visited(Pos::new(1, 0)),
                SearchEvent::Visited(Pos::new(0, 1)),
                SearchEvent::PathCell(Pos::new(1, 0)),
                SearchEvent::Finished(Outcome::PathFound(path.clone())),
            ]
        );
        assert_eq!(run.outcome, Outcome::PathFound(path));
    }

    #[test]
    fn path_cells_walk_back_from_goal() {
        let g = board(1, 5, &[]);
        let run = search(&g, (0, 0), (0, 4));
        let cells: Vec<Pos> = run
            .events
            .iter()
            .filter_map(|ev| match ev {
                SearchEvent::PathCell(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(cells, vec![Pos::new(0, 3), Pos::new(0, 2), Pos::new(0, 1)]);
        assert!(run.events.last().unwrap().is_terminal());
        assert!(!visited(&run).contains(&Pos::new(0, 4)));
    }

    #[test]
    fn adjacent_endpoints_finish_without_path_cells() {
        let g = board(1, 2, &[]);
        let run = search(&g, (0, 0), (0, 1));
        assert_eq!(
            run.events,
            vec![
                SearchEvent::Visited(Pos::new(0, 0)),
                SearchEvent::Finished(Outcome::PathFound(vec![Pos::new(0, 0), Pos::new(0, 1)])),
            ]
        );
    }

    #[test]
    fn wall_gives_no_path_and_visits_whole_component() {
        let wall: Vec<_> = (0..4).map(|r| (r, 2)).collect();
        let g = board(4, 5, &wall);
        let run = search(&g, (0, 0), (3, 4));
        assert_eq!(run.outcome, Outcome::NoPathExists);
        assert!(run.events.iter().all(|ev| !matches!(ev, SearchEvent::PathCell(_))));

        let seen: HashSet<Pos> = visited(&run).into_iter().collect();
        assert_eq!(seen, reachable(&g, Pos::new(0, 0)));
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn detour_around_obstacles_is_optimal() {
        // . . . . .
        // # # # # .
        // . . . . .
        let g = board(3, 5, &[(1, 0), (1, 1), (1, 2), (1, 3)]);
        let run = search(&g, (2, 0), (0, 0));
        assert_eq!(run.outcome.path().unwrap().len(), 11);
    }

    #[test]
    fn no_obstacle_events_and_no_revisits() {
        let walls = [(0, 3), (1, 1), (1, 3), (2, 1), (3, 1), (3, 2), (3, 4), (4, 4)];
        let g = board(6, 6, &walls);
        let run = search(&g, (0, 0), (5, 5));
        let v = visited(&run);
        let unique: HashSet<Pos> = v.iter().copied().collect();
        assert_eq!(unique.len(), v.len());
        for ev in &run.events {
            if let Some(p) = ev.pos() {
                assert!(g.is_passable(p), "event on obstacle {p}");
            }
        }
        if let Some(path) = run.outcome.path() {
            assert!(path.iter().all(|&p| g.is_passable(p)));
        }
    }

    #[test]
    fn rerun_is_identical() {
        let g = board(7, 7, &[(2, 2), (2, 3), (2, 4), (4, 1), (5, 5)]);
        let a = search(&g, (0, 3), (6, 3));
        let b = search(&g, (0, 3), (6, 3));
        assert_eq!(a, b);
    }

    #[test]
    fn precondition_errors() {
        let mut g = board(3, 3, &[(1, 1)]);
        assert_eq!(
            Search::new(&g, None, Some(Pos::new(0, 0))).err(),
            Some(SearchError::MissingEndpoints(EndpointProblem::StartUnset))
        );
        assert_eq!(
            Search::new(&g, Some(Pos::new(0, 0)), None).err(),
            Some(SearchError::MissingEndpoints(EndpointProblem::EndUnset))
        );
        assert_eq!(
            Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(1, 1))).err(),
            Some(SearchError::MissingEndpoints(EndpointProblem::Blocked(
                Pos::new(1, 1)
            )))
        );
        assert_eq!(
            Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(3, 0))).err(),
            Some(SearchError::InvalidCoordinate(Pos::new(3, 0)))
        );
        assert_eq!(
            Search::from_board(&g).err(),
            Some(SearchError::MissingEndpoints(EndpointProblem::StartUnset))
        );
        g.set_start(Pos::new(0, 0)).unwrap();
        g.set_end(Pos::new(2, 2)).unwrap();
        assert!(Search::from_board(&g).is_ok());
    }

    #[test]
    fn single_cell_grid_rejects_same_endpoints() {
        let g = board(1, 1, &[]);
        assert_eq!(
            Search::new(&g, Some(Pos::ZERO), Some(Pos::ZERO)).err(),
            Some(SearchError::MissingEndpoints(EndpointProblem::Coincident))
        );
    }

    #[test]
    fn iterator_is_fused_and_tracks_state() {
        let g = board(3, 3, &[]);
        let mut s = Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(0, 2))).unwrap();
        assert!(!s.is_finished());
        let events: Vec<_> = s.by_ref().collect();
        assert!(s.is_finished());
        let n_visited = events
            .iter()
            .filter(|e| matches!(e, SearchEvent::Visited(_)))
            .count();
        assert_eq!(s.visited_count(), n_visited);
        assert_eq!(s.next(), None);
        assert_eq!(s.outcome().and_then(|o| o.path()).map(|p| p.len()), Some(3));
    }

    #[test]
    fn search_snapshots_the_board() {
        let mut g = board(1, 3, &[]);
        let s = Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(0, 2))).unwrap();
        g.set_obstacle(Pos::new(0, 1));
        let run = s.run_to_end().unwrap();
        assert_eq!(run.outcome.path().map(|p| p.len()), Some(3));
    }

    #[test]
    fn cancel_mid_run_stops_events() {
        let g = board(5, 5, &[]);
        let mut s = Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(4, 4))).unwrap();
        assert_eq!(s.next(), Some(SearchEvent::Visited(Pos::new(0, 0))));
        s.cancel();
        assert!(s.is_cancelled());
        assert!(!s.is_finished());
        assert_eq!(s.next(), None);
        assert_eq!(s.outcome(), None);
        assert_eq!(s.visited_count(), 1);
        assert_eq!(s.run_to_end(), None);
    }

    #[test]
    fn cancel_while_tracing_drops_the_path() {
        let g = board(1, 4, &[]);
        let mut s = Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(0, 3))).unwrap();
        let first_path_cell = s.find(|ev| matches!(ev, SearchEvent::PathCell(_)));
        assert_eq!(first_path_cell, Some(SearchEvent::PathCell(Pos::new(0, 2))));
        s.cancel();
        assert_eq!(s.next(), None);
    }

    #[test]
    fn cancel_after_finish_keeps_outcome() {
        let g = board(1, 2, &[]);
        let mut s = Search::new(&g, Some(Pos::new(0, 0)), Some(Pos::new(0, 1))).unwrap();
        s.by_ref().for_each(drop);
        s.cancel();
        assert!(!s.is_cancelled());
        assert!(s.outcome().is_some());
    }

    #[test]
    fn obstacles_fix_the_exact_event_order() {
        let g = board(4, 4, &[(1, 1), (2, 2)]);
        let run = search(&g, (0, 0), (3, 3));
        let p = |r, c| Pos::new(r, c);
        let mut expected: Vec<SearchEvent> = [
            (0, 0), (1, 0), (0, 1), (2, 0), (0, 2), (3, 0), (2, 1),
            (1, 2), (0, 3), (3, 1), (1, 3), (3, 2), (2, 3),
        ]
        .into_iter()
        .map(|(r, c)| SearchEvent::Visited(p(r, c)))
        .collect();
        expected.extend(
            [(3, 2), (3, 1), (3, 0), (2, 0), (1, 0)]
                .into_iter()
                .map(|(r, c)| SearchEvent::PathCell(p(r, c))),
        );
        let path = vec![p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(3, 1), p(3, 2), p(3, 3)];
        expected.push(SearchEvent::Finished(Outcome::PathFound(path)));
        assert_eq!(run.events, expected);
    }
}
