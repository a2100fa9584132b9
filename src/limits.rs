//! Hard caps on simulation sizes. Anything above these is rejected at
//! configuration time, before a grid is allocated.

pub const MAX_DAYS: usize = 3_660;
pub const MAX_STATIONS: usize = 1_024;
pub const MAX_SEATS: usize = 4_096;
pub const MAX_WORKERS: usize = 1_024;
pub const MAX_THREADS: usize = 512;
pub const MAX_REQUESTS: usize = 10_000_000;

/// Upper bound on `days * seats * segments`.
pub const MAX_GRID_CELLS: usize = 256 * 1024 * 1024;

/// Upper bound on a decoded snapshot frame payload.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024 * 1024;
