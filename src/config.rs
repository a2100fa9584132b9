use std::str::FromStr;

use crate::engine::EngineError;
use crate::grid::GridDims;
use crate::limits::*;

/// Everything one simulation run needs. Defaults reproduce a small line:
/// a week of days, 6 stations, 10 seats, 150 requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub days: usize,
    pub stations: usize,
    pub seats: usize,
    pub requests: usize,
    pub background_bookings: usize,
    pub workers: usize,
    pub threads: usize,
    /// Each occupied cell is cancelled with probability `1 / cancel_one_in`.
    pub cancel_one_in: u32,
    /// Fixed seed for generation and cancellation; drawn from entropy when unset.
    pub seed: Option<u64>,
    pub metrics_port: Option<u16>,
    pub report_json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            days: 7,
            stations: 6,
            seats: 10,
            requests: 150,
            background_bookings: 50,
            workers: 4,
            threads: default_threads(),
            cancel_one_in: 5,
            seed: None,
            metrics_port: None,
            report_json: false,
        }
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(MAX_THREADS)
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

impl SimConfig {
    /// Read `RAILGRID_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SimConfig::from_env`] with an arbitrary variable source.
    /// Unparsable values fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            days: parsed(&lookup, "RAILGRID_DAYS").unwrap_or(d.days),
            stations: parsed(&lookup, "RAILGRID_STATIONS").unwrap_or(d.stations),
            seats: parsed(&lookup, "RAILGRID_SEATS").unwrap_or(d.seats),
            requests: parsed(&lookup, "RAILGRID_REQUESTS").unwrap_or(d.requests),
            background_bookings: parsed(&lookup, "RAILGRID_BACKGROUND_BOOKINGS")
                .unwrap_or(d.background_bookings),
            workers: parsed(&lookup, "RAILGRID_WORKERS").unwrap_or(d.workers),
            threads: parsed(&lookup, "RAILGRID_THREADS").unwrap_or(d.threads),
            cancel_one_in: parsed(&lookup, "RAILGRID_CANCEL_ONE_IN").unwrap_or(d.cancel_one_in),
            seed: parsed(&lookup, "RAILGRID_SEED"),
            metrics_port: parsed(&lookup, "RAILGRID_METRICS_PORT"),
            report_json: lookup("RAILGRID_REPORT_JSON")
                .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes")),
        }
    }

    /// Grid shape for this line.
    pub fn dims(&self) -> Result<GridDims, EngineError> {
        GridDims::for_stations(self.days, self.stations, self.seats)
    }

    /// Reject configurations no phase could run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.workers == 0 {
            return Err(EngineError::InvalidWorkerCount(0));
        }
        if self.workers > MAX_WORKERS {
            return Err(EngineError::LimitExceeded("too many workers"));
        }
        if self.threads == 0 || self.threads > MAX_THREADS {
            return Err(EngineError::LimitExceeded("thread count out of range"));
        }
        if self.requests > MAX_REQUESTS || self.background_bookings > MAX_REQUESTS {
            return Err(EngineError::LimitExceeded("too many requests"));
        }
        if self.cancel_one_in == 0 {
            return Err(EngineError::LimitExceeded("cancel_one_in must be positive"));
        }
        self.dims()?;
        Ok(())
    }
}
