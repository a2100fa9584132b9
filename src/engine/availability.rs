use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::grid::OccupancyGrid;
use crate::model::*;

// ── Availability check ────────────────────────────────────────────

/// True iff at least one seat is free on every segment of `trip` on `day`.
///
/// Seats are scanned in parallel on `pool`. The shared `found` flag only ever
/// goes false → true, so concurrent stores need no coordination; workers that
/// see it set skip their seat. No particular seat is identified.
pub fn is_available(pool: &rayon::ThreadPool, grid: &OccupancyGrid, day: Day, trip: Trip) -> bool {
    let found = AtomicBool::new(false);
    pool.install(|| {
        (0..grid.dims().seats).into_par_iter().for_each(|seat| {
            if found.load(Ordering::Relaxed) {
                return;
            }
            if grid.is_range_free(day, seat, trip) {
                found.store(true, Ordering::Relaxed);
            }
        });
    });
    // install() joins every task before returning
    found.load(Ordering::Acquire)
}

/// Sequential form of [`is_available`], used where no pool is available and
/// as the reference in tests.
pub fn is_available_seq(grid: &OccupancyGrid, day: Day, trip: Trip) -> bool {
    (0..grid.dims().seats).any(|seat| grid.is_range_free(day, seat, trip))
}
