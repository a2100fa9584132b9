use super::*;
use crate::grid::{GridDims, OccupancyGrid};

/// Helper to build an empty grid for engine tests.
fn make_grid(days: usize, seats: usize, segments: usize) -> OccupancyGrid {
    OccupancyGrid::new(GridDims {
        days,
        seats,
        segments,
    })
}

fn engine() -> Engine {
    Engine::new(2).unwrap()
}

fn req(day: Day, src: Station, dst: Station) -> Request {
    Request::new(day, src, dst)
}

// ── Construction ─────────────────────────────────────────

#[test]
fn engine_rejects_zero_threads() {
    assert!(matches!(Engine::new(0), Err(EngineError::LimitExceeded(_))));
}

#[test]
fn engine_rejects_too_many_threads() {
    let result = Engine::new(crate::limits::MAX_THREADS + 1);
    assert!(matches!(result, Err(EngineError::LimitExceeded(_))));
}

#[test]
fn engine_reports_pool_size() {
    assert_eq!(Engine::new(3).unwrap().threads(), 3);
}

// ── Check + assign ───────────────────────────────────────

#[test]
fn availability_agrees_with_assignment() {
    let engine = engine();
    let mut grid = make_grid(1, 3, 4);
    grid.occupy(0, 0, Trip::new(0, 2));
    grid.occupy(0, 1, Trip::new(1, 3));
    grid.occupy(0, 2, Trip::new(3, 4));

    for src in 0..4 {
        for dst in src + 1..=4 {
            let r = req(0, src, dst);
            let available = engine.is_available(&grid, &r);
            let mut scratch = grid.clone();
            let seat = engine.assign(&mut scratch, &r);
            assert_eq!(available, seat.is_some(), "trip {src}..{dst}");
            assert_eq!(first_free_seat(&grid, 0, r.trip), seat);
        }
    }
}

#[test]
fn try_book_when_full_leaves_grid_unchanged() {
    let engine = engine();
    let mut grid = make_grid(1, 1, 2);
    grid.occupy(0, 0, Trip::new(1, 2));
    let before = grid.clone();
    assert_eq!(engine.try_book(&mut grid, &req(0, 0, 2)), None);
    assert_eq!(grid, before);
}

// ── Batch resolution ─────────────────────────────────────

#[test]
fn two_trips_fill_two_seats() {
    // 1 day, 2 seats, 2 segments. First trip takes both segments on seat 0,
    // second needs segment 0 and lands on seat 1.
    let engine = engine();
    let mut grid = make_grid(1, 2, 2);
    let resolution = engine.resolve(&mut grid, &[req(0, 0, 2), req(0, 0, 1)]);

    assert_eq!(resolution.confirmed(), 2);
    assert!(resolution.waitlist.is_empty());
    assert_eq!(
        resolution.outcomes,
        vec![Outcome::Confirmed { seat: 0 }, Outcome::Confirmed { seat: 1 }]
    );
    assert!(grid.is_occupied(0, 0, 0));
    assert!(grid.is_occupied(0, 0, 1));
    assert!(grid.is_occupied(0, 1, 0));
    assert!(!grid.is_occupied(0, 1, 1));
}

#[test]
fn waitlist_preserves_input_order() {
    let engine = engine();
    let mut grid = make_grid(2, 1, 3);
    // Day 1 is fully booked, so every day-1 request is waitlisted.
    grid.occupy(1, 0, Trip::new(0, 3));

    let requests = vec![
        req(0, 0, 1),
        req(1, 0, 2),
        req(0, 1, 2),
        req(1, 2, 3),
        req(0, 2, 3),
    ];
    let resolution = engine.resolve(&mut grid, &requests);

    assert_eq!(resolution.confirmed(), 3);
    assert_eq!(resolution.waitlist, vec![requests[1], requests[3]]);
    assert_eq!(resolution.outcomes[1], Outcome::Waitlisted);
    assert_eq!(resolution.outcomes[3], Outcome::Waitlisted);
}

#[test]
fn later_request_sees_earlier_assignment() {
    let engine = engine();
    let mut grid = make_grid(1, 1, 3);
    let resolution = engine.resolve(&mut grid, &[req(0, 0, 2), req(0, 1, 3), req(0, 2, 3)]);
    assert_eq!(
        resolution.outcomes,
        vec![
            Outcome::Confirmed { seat: 0 },
            Outcome::Waitlisted,
            Outcome::Confirmed { seat: 0 },
        ]
    );
    assert_eq!(resolution.waitlist, vec![req(0, 1, 3)]);
}

#[test]
fn resolve_empty_batch() {
    let engine = engine();
    let mut grid = make_grid(1, 1, 1);
    let resolution = engine.resolve(&mut grid, &[]);
    assert_eq!(resolution, Resolution::default());
    assert_eq!(resolution.confirmed(), 0);
}

#[test]
fn background_bookings_skip_what_does_not_fit() {
    let engine = engine();
    let mut grid = make_grid(1, 1, 4);
    let seated = engine.book_background(
        &mut grid,
        &[req(0, 0, 3), req(0, 1, 4), req(0, 3, 4)],
    );
    assert_eq!(seated, 2);
    assert_eq!(grid.occupied_count(), 4);
}

#[test]
fn every_request_is_classified_once() {
    let engine = engine();
    let mut grid = make_grid(3, 2, 5);
    let requests: Vec<Request> = (0..40)
        .map(|i| {
            let src = i % 4;
            req(i % 3, src, src + 1 + (i % (5 - src)))
        })
        .collect();
    let resolution = engine.resolve(&mut grid, &requests);

    assert_eq!(resolution.outcomes.len(), requests.len());
    let waitlisted = resolution
        .outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Waitlisted))
        .count();
    assert_eq!(waitlisted, resolution.waitlist.len());
    // Confirmed trips account for every occupied cell.
    let occupied: usize = requests
        .iter()
        .zip(&resolution.outcomes)
        .filter(|(_, o)| matches!(o, Outcome::Confirmed { .. }))
        .map(|(r, _)| r.trip.dst - r.trip.src)
        .sum();
    assert_eq!(grid.occupied_count(), occupied);
}
