use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::engine::EngineError;
use crate::grid::OccupancyGrid;

/// Something that frees previously occupied segments between the live phase
/// and the distributed phase. Cancellations only ever clear cells.
pub trait CancellationPolicy {
    /// Free cells in `grid`; returns how many segments were freed.
    fn cancel(&mut self, grid: &mut OccupancyGrid) -> usize;
}

/// Frees each occupied cell independently with probability `1 / one_in`.
///
/// Works cell by cell, so part of a multi-segment trip can be freed while the
/// rest stays taken.
#[derive(Debug, Clone)]
pub struct RandomCancellation {
    rng: ChaCha8Rng,
    one_in: u32,
}

impl RandomCancellation {
    /// `one_in == 0` has no probability to map to and is rejected.
    pub fn new(seed: u64, one_in: u32) -> Result<Self, EngineError> {
        if one_in == 0 {
            return Err(EngineError::LimitExceeded("cancel_one_in must be positive"));
        }
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            one_in,
        })
    }
}

impl CancellationPolicy for RandomCancellation {
    fn cancel(&mut self, grid: &mut OccupancyGrid) -> usize {
        let occupied: Vec<_> = grid.occupied_cells().collect();
        let mut freed = 0;
        for (day, seat, segment) in occupied {
            if self.rng.gen_range(0..self.one_in) == 0 && grid.free(day, seat, segment) {
                freed += 1;
            }
        }
        metrics::counter!(crate::observability::SEGMENTS_CANCELLED_TOTAL).increment(freed as u64);
        info!("cancellations: {freed} segments freed");
        freed
    }
}

/// Frees nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCancellation;

impl CancellationPolicy for NoCancellation {
    fn cancel(&mut self, _grid: &mut OccupancyGrid) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;
    use crate::model::Trip;

    fn full_grid() -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(GridDims {
            days: 4,
            seats: 8,
            segments: 5,
        });
        for day in 0..4 {
            for seat in 0..8 {
                grid.occupy(day, seat, Trip::new(0, 5));
            }
        }
        grid
    }

    #[test]
    fn cancellation_only_clears() {
        let mut grid = full_grid();
        let before = grid.clone();
        let freed = RandomCancellation::new(7, 3).unwrap().cancel(&mut grid);

        assert_eq!(grid.occupied_count(), before.occupied_count() - freed);
        // Nothing that was free became occupied.
        let mut merged = before.clone();
        merged.merge_from(&grid).unwrap();
        assert_eq!(merged, before);
    }

    #[test]
    fn one_in_one_frees_everything() {
        let mut grid = full_grid();
        let freed = RandomCancellation::new(1, 1).unwrap().cancel(&mut grid);
        assert_eq!(freed, 4 * 8 * 5);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn same_seed_same_cancellations() {
        let mut a = full_grid();
        let mut b = full_grid();
        let freed_a = RandomCancellation::new(42, 5).unwrap().cancel(&mut a);
        let freed_b = RandomCancellation::new(42, 5).unwrap().cancel(&mut b);
        assert_eq!(freed_a, freed_b);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_grid_has_nothing_to_cancel() {
        let mut grid = OccupancyGrid::new(GridDims {
            days: 1,
            seats: 1,
            segments: 1,
        });
        assert_eq!(RandomCancellation::new(0, 1).unwrap().cancel(&mut grid), 0);
    }

    #[test]
    fn zero_one_in_is_rejected() {
        let result = RandomCancellation::new(3, 0);
        assert!(matches!(result, Err(EngineError::LimitExceeded(_))));
    }

    #[test]
    fn no_cancellation_is_a_no_op() {
        let mut grid = full_grid();
        let before = grid.clone();
        assert_eq!(NoCancellation.cancel(&mut grid), 0);
        assert_eq!(grid, before);
    }
}
