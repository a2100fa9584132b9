use crate::grid::OccupancyGrid;
use crate::model::*;

/// Lowest-indexed seat free across the whole of `trip`, without mutating.
pub fn first_free_seat(grid: &OccupancyGrid, day: Day, trip: Trip) -> Option<Seat> {
    (0..grid.dims().seats).find(|&seat| grid.is_range_free(day, seat, trip))
}

/// Seat the trip on the lowest-indexed fully free seat and occupy its range.
///
/// Returns `None` (not found) without touching the grid if no seat is free on
/// every segment. Sequential on purpose: the read-then-write must not
/// interleave with another assignment on the same grid.
pub fn assign_seat(grid: &mut OccupancyGrid, day: Day, trip: Trip) -> Option<Seat> {
    let seat = first_free_seat(grid, day, trip)?;
    grid.occupy(day, seat, trip);
    Some(seat)
}
