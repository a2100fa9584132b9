use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::limits::*;
use crate::model::*;

/// Shape of an occupancy grid: `days × seats × segments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub days: usize,
    pub seats: usize,
    pub segments: usize,
}

impl GridDims {
    /// Dimensions for a line with `stations` stations (`stations - 1` segments).
    pub fn for_stations(days: usize, stations: usize, seats: usize) -> Result<Self, EngineError> {
        if stations < 2 {
            return Err(EngineError::LimitExceeded("a line needs at least two stations"));
        }
        let dims = Self {
            days,
            seats,
            segments: stations - 1,
        };
        dims.validate()?;
        Ok(dims)
    }

    pub fn stations(&self) -> usize {
        self.segments + 1
    }

    pub fn cell_count(&self) -> usize {
        self.days * self.seats * self.segments
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.days == 0 || self.seats == 0 || self.segments == 0 {
            return Err(EngineError::LimitExceeded("grid dimensions must be non-zero"));
        }
        if self.days > MAX_DAYS {
            return Err(EngineError::LimitExceeded("too many days"));
        }
        if self.seats > MAX_SEATS {
            return Err(EngineError::LimitExceeded("too many seats"));
        }
        // Compare segments directly: stations() would overflow on a crafted snapshot.
        if self.segments > MAX_STATIONS - 1 {
            return Err(EngineError::LimitExceeded("too many stations"));
        }
        let cells = self
            .days
            .checked_mul(self.seats)
            .and_then(|n| n.checked_mul(self.segments));
        match cells {
            Some(n) if n <= MAX_GRID_CELLS => Ok(()),
            _ => Err(EngineError::LimitExceeded("grid too large")),
        }
    }

    /// Check a request against the line and horizon: `day < days`,
    /// `src < dst <= stations - 1`.
    pub fn check_request(&self, request: &Request) -> Result<(), EngineError> {
        let reason = if request.day >= self.days {
            "day outside scheduling horizon"
        } else if request.trip.src >= request.trip.dst {
            "source station must be before destination"
        } else if request.trip.dst > self.segments {
            "destination station past end of line"
        } else {
            return Ok(());
        };
        Err(EngineError::InvalidRequest {
            request: *request,
            reason,
        })
    }
}

/// Dense `day × seat × segment` occupancy. `true` means the seat is taken on
/// that segment of that day.
///
/// Cells are stored day-major, then seat, then segment, so one seat's segments
/// for one day are contiguous. There is no internal locking: whoever holds
/// `&mut OccupancyGrid` is the only writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    dims: GridDims,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Zero-initialized grid. Dimensions are assumed validated.
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![false; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Dimensions are within limits and the cell buffer matches them. Only
    /// needed for grids that did not come from [`OccupancyGrid::new`].
    pub fn check_shape(&self) -> Result<(), EngineError> {
        self.dims.validate()?;
        if self.cells.len() != self.dims.cell_count() {
            return Err(EngineError::Codec(format!(
                "grid has {} cells, dimensions need {}",
                self.cells.len(),
                self.dims.cell_count()
            )));
        }
        Ok(())
    }

    /// Flatten `(day, seat, segment)`. Out-of-range coordinates are a caller
    /// bug and panic here rather than aliasing another cell.
    fn index(&self, day: Day, seat: Seat, segment: Segment) -> usize {
        assert!(day < self.dims.days, "day {day} out of range (days = {})", self.dims.days);
        assert!(seat < self.dims.seats, "seat {seat} out of range (seats = {})", self.dims.seats);
        assert!(
            segment < self.dims.segments,
            "segment {segment} out of range (segments = {})",
            self.dims.segments
        );
        (day * self.dims.seats + seat) * self.dims.segments + segment
    }

    /// The cells of `trip` for one seat on one day.
    fn row(&self, day: Day, seat: Seat, trip: Trip) -> &[bool] {
        assert!(trip.src < trip.dst, "empty trip {}..{}", trip.src, trip.dst);
        assert!(
            trip.dst <= self.dims.segments,
            "trip end {} past last segment (segments = {})",
            trip.dst,
            self.dims.segments
        );
        let base = self.index(day, seat, 0);
        &self.cells[base + trip.src..base + trip.dst]
    }

    pub fn is_occupied(&self, day: Day, seat: Seat, segment: Segment) -> bool {
        self.cells[self.index(day, seat, segment)]
    }

    /// True if `seat` is free on every segment of `trip`.
    pub fn is_range_free(&self, day: Day, seat: Seat, trip: Trip) -> bool {
        !self.row(day, seat, trip).iter().any(|&taken| taken)
    }

    /// Mark every segment of `trip` occupied for `seat`.
    pub fn occupy(&mut self, day: Day, seat: Seat, trip: Trip) {
        // Bounds are checked once for the whole range before any write.
        self.row(day, seat, trip);
        let base = self.index(day, seat, 0);
        self.cells[base + trip.src..base + trip.dst].fill(true);
    }

    /// Clear one cell. Returns whether it was occupied.
    pub fn free(&mut self, day: Day, seat: Seat, segment: Segment) -> bool {
        let idx = self.index(day, seat, segment);
        std::mem::replace(&mut self.cells[idx], false)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&taken| taken).count()
    }

    /// Coordinates of every occupied cell, in storage order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Day, Seat, Segment)> + '_ {
        let seats = self.dims.seats;
        let segments = self.dims.segments;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, taken)| **taken)
            .map(move |(i, _)| (i / (seats * segments), (i / segments) % seats, i % segments))
    }

    /// Element-wise OR of `other` into `self`.
    pub fn merge_from(&mut self, other: &OccupancyGrid) -> Result<(), EngineError> {
        if self.dims != other.dims {
            return Err(EngineError::DimensionMismatch {
                expected: self.dims,
                found: other.dims,
            });
        }
        for (cell, &theirs) in self.cells.iter_mut().zip(&other.cells) {
            *cell |= theirs;
        }
        Ok(())
    }
}
