use tracing::{debug, error};

use crate::grid::OccupancyGrid;
use crate::model::*;

use super::assign::assign_seat;
use super::{Engine, Resolution};

impl Engine {
    /// Seat assignment only: lowest free seat, or `None` with the grid unchanged.
    pub fn assign(&self, grid: &mut OccupancyGrid, request: &Request) -> Option<Seat> {
        assign_seat(grid, request.day, request.trip)
    }

    /// Check availability, then assign. The check completes before the
    /// assignment starts, and nothing else can write `grid` in between.
    pub fn try_book(&self, grid: &mut OccupancyGrid, request: &Request) -> Option<Seat> {
        if !self.is_available(grid, request) {
            return None;
        }
        let seat = self.assign(grid, request);
        if seat.is_none() {
            // Availability was just confirmed on this same grid.
            error!(
                "day {} trip {}..{}: available but no seat assigned",
                request.day, request.trip.src, request.trip.dst
            );
        }
        seat
    }

    /// Resolve `requests` in order against `grid`. Seated requests are
    /// confirmed; the rest go to the waitlist in input order.
    pub fn resolve(&self, grid: &mut OccupancyGrid, requests: &[Request]) -> Resolution {
        let mut resolution = Resolution {
            outcomes: Vec::with_capacity(requests.len()),
            waitlist: Vec::new(),
        };
        for request in requests {
            match self.try_book(grid, request) {
                Some(seat) => resolution.outcomes.push(Outcome::Confirmed { seat }),
                None => {
                    resolution.outcomes.push(Outcome::Waitlisted);
                    resolution.waitlist.push(*request);
                }
            }
        }
        metrics::counter!(crate::observability::REQUESTS_CONFIRMED_TOTAL)
            .increment(resolution.confirmed() as u64);
        metrics::counter!(crate::observability::REQUESTS_WAITLISTED_TOTAL)
            .increment(resolution.waitlist.len() as u64);
        debug!(
            "resolved {} requests: {} confirmed, {} waitlisted",
            requests.len(),
            resolution.confirmed(),
            resolution.waitlist.len()
        );
        resolution
    }

    /// Pre-existing bookings placed straight through the assigner, with no
    /// availability check. Trips that do not fit are ignored. Returns how many
    /// were seated.
    pub fn book_background(&self, grid: &mut OccupancyGrid, bookings: &[Request]) -> usize {
        bookings
            .iter()
            .filter(|b| self.assign(grid, b).is_some())
            .count()
    }
}
