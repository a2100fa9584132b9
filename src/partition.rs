use std::num::NonZeroUsize;

use tracing::debug;

use crate::engine::{Engine, EngineError};
use crate::grid::OccupancyGrid;
use crate::model::*;

/// Deterministic day → worker ownership: `owner(day) = day mod workers`.
///
/// Every day has exactly one owner, so every waitlisted request is processed
/// by exactly one worker with no coordination between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    workers: NonZeroUsize,
}

impl Partition {
    /// Zero workers leaves the owner function undefined and is rejected here,
    /// before any resolution starts.
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        let workers = NonZeroUsize::new(workers).ok_or(EngineError::InvalidWorkerCount(workers))?;
        if workers.get() > crate::limits::MAX_WORKERS {
            return Err(EngineError::LimitExceeded("too many workers"));
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    pub fn owner(&self, day: Day) -> WorkerId {
        day % self.workers.get()
    }

    pub fn owns(&self, worker: WorkerId, day: Day) -> bool {
        self.owner(day) == worker
    }

    /// The subsequence of `waitlist` owned by `worker`, in input order.
    pub fn owned<'a>(self, worker: WorkerId, waitlist: &'a [Request]) -> impl Iterator<Item = &'a Request> + 'a {
        waitlist.iter().filter(move |r| self.owns(worker, r.day))
    }
}

/// What one worker did with its share of the waitlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedResolution {
    /// `(request, ClearedByOwner | StillUnresolved)` for each owned request, in order.
    pub outcomes: Vec<(Request, Outcome)>,
}

impl OwnedResolution {
    pub fn cleared(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::ClearedByOwner { .. }))
            .count()
    }

    pub fn unresolved(&self) -> usize {
        self.outcomes.len() - self.cleared()
    }
}

/// Resolve the requests `worker` owns against its private `grid`, returning
/// how many were cleared. Requests that still do not fit are dropped.
pub fn resolve_owned(
    engine: &Engine,
    worker: WorkerId,
    partition: &Partition,
    grid: &mut OccupancyGrid,
    waitlist: &[Request],
) -> Result<usize, EngineError> {
    Ok(resolve_owned_detailed(engine, worker, partition, grid, waitlist)?.cleared())
}

/// [`resolve_owned`] keeping the per-request outcome.
pub fn resolve_owned_detailed(
    engine: &Engine,
    worker: WorkerId,
    partition: &Partition,
    grid: &mut OccupancyGrid,
    waitlist: &[Request],
) -> Result<OwnedResolution, EngineError> {
    if worker >= partition.workers() {
        return Err(EngineError::InvalidWorkerId {
            worker,
            workers: partition.workers(),
        });
    }
    let mut resolution = OwnedResolution::default();
    for request in partition.owned(worker, waitlist) {
        let outcome = match engine.try_book(grid, request) {
            Some(seat) => Outcome::ClearedByOwner { worker, seat },
            None => Outcome::StillUnresolved { worker },
        };
        resolution.outcomes.push((*request, outcome));
    }
    debug!(
        "worker {worker}: {} owned, {} cleared, {} dropped",
        resolution.outcomes.len(),
        resolution.cleared(),
        resolution.unresolved()
    );
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;

    fn make_grid(days: usize, seats: usize, segments: usize) -> OccupancyGrid {
        OccupancyGrid::new(GridDims {
            days,
            seats,
            segments,
        })
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(Partition::new(0), Err(EngineError::InvalidWorkerCount(0))));
    }

    #[test]
    fn too_many_workers_rejected() {
        let result = Partition::new(crate::limits::MAX_WORKERS + 1);
        assert!(matches!(result, Err(EngineError::LimitExceeded(_))));
    }

    #[test]
    fn every_day_has_exactly_one_owner() {
        for workers in 1..=9 {
            let p = Partition::new(workers).unwrap();
            for day in 0..100 {
                let owners = (0..workers).filter(|&w| p.owns(w, day)).count();
                assert_eq!(owners, 1, "day {day} with {workers} workers");
                assert!(p.owner(day) < workers);
            }
        }
    }

    #[test]
    fn owned_subsequences_cover_waitlist() {
        let p = Partition::new(3).unwrap();
        let waitlist: Vec<Request> = (0..10).map(|d| Request::new(d, 0, 1)).collect();
        let mut seen: Vec<Request> = (0..3).flat_map(|w| p.owned(w, &waitlist).copied()).collect();
        seen.sort_by_key(|r| r.day);
        assert_eq!(seen, waitlist);

        let w1: Vec<Day> = p.owned(1, &waitlist).map(|r| r.day).collect();
        assert_eq!(w1, vec![1, 4, 7]);
    }

    #[test]
    fn only_owner_touches_request() {
        // 2 workers; a day-3 request belongs to worker 3 mod 2 = 1.
        let engine = Engine::new(1).unwrap();
        let p = Partition::new(2).unwrap();
        let waitlist = vec![Request::new(3, 0, 2)];
        let base = make_grid(4, 1, 2);

        let mut grid0 = base.clone();
        let cleared0 = resolve_owned(&engine, 0, &p, &mut grid0, &waitlist).unwrap();
        assert_eq!(cleared0, 0);
        assert_eq!(grid0, base);

        let mut grid1 = base.clone();
        let cleared1 = resolve_owned(&engine, 1, &p, &mut grid1, &waitlist).unwrap();
        assert_eq!(cleared1, 1);
        assert!(grid1.is_occupied(3, 0, 0));
        assert!(grid1.is_occupied(3, 0, 1));
    }

    #[test]
    fn unresolved_requests_are_dropped() {
        let engine = Engine::new(1).unwrap();
        let p = Partition::new(1).unwrap();
        let mut grid = make_grid(1, 1, 2);
        grid.occupy(0, 0, Trip::new(0, 1));
        let waitlist = vec![Request::new(0, 0, 2), Request::new(0, 1, 2)];

        let resolution = resolve_owned_detailed(&engine, 0, &p, &mut grid, &waitlist).unwrap();
        assert_eq!(
            resolution.outcomes,
            vec![
                (waitlist[0], Outcome::StillUnresolved { worker: 0 }),
                (waitlist[1], Outcome::ClearedByOwner { worker: 0, seat: 0 }),
            ]
        );
        assert_eq!(resolution.cleared(), 1);
        assert_eq!(resolution.unresolved(), 1);
    }

    #[test]
    fn worker_id_out_of_range_rejected() {
        let engine = Engine::new(1).unwrap();
        let p = Partition::new(2).unwrap();
        let mut grid = make_grid(1, 1, 1);
        let result = resolve_owned(&engine, 2, &p, &mut grid, &[]);
        assert!(matches!(result, Err(EngineError::InvalidWorkerId { worker: 2, workers: 2 })));
    }
}
