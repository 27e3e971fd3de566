//! [`PathSearchEngine`] — owns the single active search and its pacing.
//!
//! The engine never sleeps on its own except in [`run_blocking`]. A caller
//! with its own event loop feeds the current time to [`poll`] and waits
//! until [`next_due`] between calls; tests use [`step`] to advance without
//! any timing at all.
//!
//! [`run_blocking`]: PathSearchEngine::run_blocking
//! [`poll`]: PathSearchEngine::poll
//! [`next_due`]: PathSearchEngine::next_due
//! [`step`]: PathSearchEngine::step

use std::ops::ControlFlow;
use std::time::Instant;

use pathviz_core::Pos;

use crate::astar::Search;
use crate::error::SearchError;
use crate::event::{Outcome, SearchEvent};
use crate::pacing::Pacing;
use crate::traits::Board;

struct Active {
    search: Search,
    /// When the next step may run. `None` means immediately.
    due: Option<Instant>,
}

/// Runs at most one [`Search`] at a time, spaced out by a [`Pacing`].
#[derive(Default)]
pub struct PathSearchEngine {
    pacing: Pacing,
    active: Option<Active>,
}

impl PathSearchEngine {
    /// Create an idle engine with the given pacing.
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            active: None,
        }
    }

    #[inline]
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Mutable access to the pacing. Changes apply from the next step on,
    /// including for a search already running.
    #[inline]
    pub fn pacing_mut(&mut self) -> &mut Pacing {
        &mut self.pacing
    }

    /// Whether a search is in flight.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// The active search, if any.
    pub fn search(&self) -> Option<&Search> {
        self.active.as_ref().map(|a| &a.search)
    }

    /// Start a search between the board's own start and end cells.
    pub fn start<B: Board + ?Sized>(&mut self, board: &B) -> Result<(), SearchError> {
        self.start_with(board, board.start(), board.end())
    }

    /// Start a search between explicit endpoints.
    ///
    /// Rejected with [`SearchError::Busy`] while another search is running;
    /// cancel it or let it finish first.
    pub fn start_with<B: Board + ?Sized>(
        &mut self,
        board: &B,
        start: Option<Pos>,
        end: Option<Pos>,
    ) -> Result<(), SearchError> {
        if self.active.is_some() {
            log::debug!("search rejected: another search is running");
            return Err(SearchError::Busy);
        }
        let search = Search::new(board, start, end)?;
        self.active = Some(Active { search, due: None });
        Ok(())
    }

    /// Cancel and release the active search. No further events are produced
    /// for it.
    ///
    /// Returns whether a search was running.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(mut a) => {
                a.search.cancel();
                true
            }
            None => false,
        }
    }

    /// When the next step is due, or `None` if idle.
    pub fn next_due(&self) -> Option<Instant> {
        self.active.as_ref().map(|a| a.due.unwrap_or_else(Instant::now))
    }

    /// Advance one step if it is due at `now`.
    ///
    /// The following step is scheduled `pacing.interval()` after `now`, with
    /// the pacing read at this moment.
    pub fn poll(&mut self, now: Instant) -> Option<SearchEvent> {
        let due = self.active.as_ref()?.due;
        if due.is_some_and(|d| now < d) {
            return None;
        }
        let event = self.step()?;
        if let Some(a) = self.active.as_mut() {
            a.due = Some(now + self.pacing.interval());
        }
        Some(event)
    }

    /// Advance one step immediately, ignoring pacing.
    ///
    /// The terminal event ends the search and frees the engine.
    pub fn step(&mut self) -> Option<SearchEvent> {
        let active = self.active.as_mut()?;
        let event = active.search.step();
        if event.as_ref().is_none_or(SearchEvent::is_terminal) {
            self.active = None;
        }
        event
    }

    /// Drive the active search to completion on the current thread,
    /// sleeping for the current pacing interval after every non-terminal
    /// event.
    ///
    /// `sink` sees every event together with the pacing, which it may
    /// adjust. Returning [`ControlFlow::Break`] cancels the search; the
    /// result is then `None`, as it is when no search was active.
    pub fn run_blocking<F>(&mut self, mut sink: F) -> Option<Outcome>
    where
        F: FnMut(&SearchEvent, &mut Pacing) -> ControlFlow<()>,
    {
        while let Some(event) = self.step() {
            let flow = sink(&event, &mut self.pacing);
            if let SearchEvent::Finished(outcome) = event {
                return Some(outcome);
            }
            if flow.is_break() {
                self.cancel();
                return None;
            }
            std::thread::sleep(self.pacing.interval());
        }
        None
    }
}
