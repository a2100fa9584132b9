mod assign;
mod availability;
mod error;
mod mutations;
mod queries;
#[cfg(test)]
mod tests;

pub use assign::{assign_seat, first_free_seat};
pub use availability::{is_available, is_available_seq};
pub use error::EngineError;

use crate::limits::MAX_THREADS;
use crate::model::*;

/// Result of resolving a batch of requests against one grid.
///
/// `outcomes[i]` is the classification of the `i`-th input request;
/// `waitlist` holds the requests that could not be seated, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub outcomes: Vec<Outcome>,
    pub waitlist: Vec<Request>,
}

impl Resolution {
    pub fn confirmed(&self) -> usize {
        self.outcomes.len() - self.waitlist.len()
    }
}

/// Seat search and assignment over an [`OccupancyGrid`](crate::grid::OccupancyGrid).
///
/// The engine owns a fixed-size pool used to fan availability checks out over
/// seats. It holds no grid: every operation borrows the grid it works on, and
/// mutating operations take `&mut`, so a grid has one writer at a time.
pub struct Engine {
    pool: rayon::ThreadPool,
}

impl Engine {
    pub fn new(threads: usize) -> Result<Self, EngineError> {
        if threads == 0 || threads > MAX_THREADS {
            return Err(EngineError::LimitExceeded("thread count out of range"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("railgrid-seat-{i}"))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("threads", &self.threads()).finish()
    }
}
