use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::GridDims;
use crate::model::*;

/// Seeded source of travel requests and background bookings for one line.
///
/// Every request it produces satisfies `day < days` and
/// `src < dst <= stations - 1`.
#[derive(Debug, Clone)]
pub struct RequestGenerator {
    rng: ChaCha8Rng,
    dims: GridDims,
}

impl RequestGenerator {
    pub fn new(seed: u64, dims: GridDims) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            dims,
        }
    }

    /// Uniform day, uniform source station, destination uniform over the
    /// stations after it.
    pub fn request(&mut self) -> Request {
        let day = self.rng.gen_range(0..self.dims.days);
        let src = self.rng.gen_range(0..self.dims.segments);
        let dst = self.rng.gen_range(src + 1..=self.dims.segments);
        Request::new(day, src, dst)
    }

    pub fn requests(&mut self, n: usize) -> Vec<Request> {
        (0..n).map(|_| self.request()).collect()
    }

    /// A pre-existing booking: boards in the first half of the line and
    /// leaves in the second half, so it spans the middle of the line.
    pub fn background_booking(&mut self) -> Request {
        let half = self.dims.stations() / 2;
        let day = self.rng.gen_range(0..self.dims.days);
        let src = self.rng.gen_range(0..half);
        let dst = self.rng.gen_range(half..=self.dims.segments);
        Request::new(day, src, dst)
    }

    pub fn background_bookings(&mut self, n: usize) -> Vec<Request> {
        (0..n).map(|_| self.background_booking()).collect()
    }
}
