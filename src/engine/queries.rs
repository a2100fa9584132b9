use crate::grid::OccupancyGrid;
use crate::model::*;

use super::availability::is_available;
use super::Engine;

impl Engine {
    /// Does any seat have the request's whole trip free? Parallel over seats.
    pub fn is_available(&self, grid: &OccupancyGrid, request: &Request) -> bool {
        is_available(&self.pool, grid, request.day, request.trip)
    }
}
