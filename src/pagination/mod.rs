//! Pagination module
//!
//! Supports: seen-count (total vs items seen), next token, single page
//!
//! # Overview
//!
//! Each strategy inspects a fetched page for a continuation signal and
//! produces the cursor for the next request. `PaginationDriver` wraps a
//! strategy in the Init / HasMore / Done state machine the sync engine runs.

mod driver;
mod strategies;
mod types;

pub use driver::PaginationDriver;
pub use strategies::{NextTokenPaginator, NoPaginator, SeenCountPaginator};
pub use types::{PageCursor, PaginationConfig, PaginationPhase, PaginationState, Paginator};

#[cfg(test)]
mod tests;
