//! Per-stream pagination state machine

use super::types::{PageCursor, PaginationConfig, PaginationPhase, PaginationState, Paginator};
use crate::types::JsonValue;
use tracing::trace;

/// Drives one stream's page sequence: Init, then HasMore until Done
pub struct PaginationDriver {
    paginator: Box<dyn Paginator>,
    paginate: bool,
    phase: PaginationPhase,
    cursor: Option<PageCursor>,
    state: PaginationState,
}

impl PaginationDriver {
    /// Create a driver; `paginate = false` stops after the first page
    pub fn new(paginate: bool, config: &PaginationConfig) -> Self {
        Self {
            paginator: config.build(),
            paginate,
            phase: PaginationPhase::Init,
            cursor: None,
            state: PaginationState::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> PaginationPhase {
        self.phase
    }

    /// Check whether the sequence has ended
    pub fn is_done(&self) -> bool {
        self.phase == PaginationPhase::Done
    }

    /// Cursor for the next request (absent before the first page)
    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    /// Pages processed so far
    pub fn pages(&self) -> usize {
        self.state.pages
    }

    /// Records seen so far
    pub fn records_seen(&self) -> u64 {
        self.state.records_seen
    }

    /// Record a processed page and decide whether another is needed
    pub fn advance(&mut self, body: &JsonValue, records_count: usize) -> PaginationPhase {
        if self.is_done() {
            return self.phase;
        }

        self.state.pages += 1;
        self.state.records_seen += records_count as u64;

        let next = if self.paginate {
            self.paginator
                .next_cursor(body, records_count, &mut self.state)
                .filter(|cursor| !cursor.is_empty())
        } else {
            None
        };

        match next {
            Some(cursor) => {
                trace!(page = self.state.pages, cursor = ?cursor.params(), "More pages");
                self.cursor = Some(cursor);
                self.phase = PaginationPhase::HasMore;
            }
            None => {
                self.cursor = None;
                self.phase = PaginationPhase::Done;
            }
        }

        self.phase
    }
}

impl std::fmt::Debug for PaginationDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationDriver")
            .field("paginate", &self.paginate)
            .field("phase", &self.phase)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
