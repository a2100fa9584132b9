use crate::grid::GridDims;
use crate::model::{Request, WorkerId};

#[derive(Debug)]
pub enum EngineError {
    InvalidWorkerCount(usize),
    InvalidWorkerId {
        worker: WorkerId,
        workers: usize,
    },
    InvalidRequest {
        request: Request,
        reason: &'static str,
    },
    LimitExceeded(&'static str),
    DimensionMismatch {
        expected: GridDims,
        found: GridDims,
    },
    NoWorkerGrids,
    Codec(String),
    ChecksumMismatch {
        expected: u32,
        found: u32,
    },
    WorkerFailed {
        worker: WorkerId,
        reason: String,
    },
    ThreadPool(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidWorkerCount(n) => {
                write!(f, "invalid worker count {n}: at least one worker is required")
            }
            EngineError::InvalidWorkerId { worker, workers } => {
                write!(f, "worker id {worker} out of range for {workers} workers")
            }
            EngineError::InvalidRequest { request, reason } => write!(
                f,
                "invalid request (day {}, {} -> {}): {reason}",
                request.day, request.trip.src, request.trip.dst
            ),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::DimensionMismatch { expected, found } => write!(
                f,
                "grid dimension mismatch: expected {}x{}x{}, found {}x{}x{}",
                expected.days,
                expected.seats,
                expected.segments,
                found.days,
                found.seats,
                found.segments
            ),
            EngineError::NoWorkerGrids => write!(f, "nothing to reduce: no worker grids"),
            EngineError::Codec(e) => write!(f, "snapshot codec error: {e}"),
            EngineError::ChecksumMismatch { expected, found } => {
                write!(f, "snapshot checksum mismatch: expected {expected:#010x}, found {found:#010x}")
            }
            EngineError::WorkerFailed { worker, reason } => {
                write!(f, "worker {worker} failed: {reason}")
            }
            EngineError::ThreadPool(e) => write!(f, "thread pool error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
