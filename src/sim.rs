use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;
use ulid::Ulid;

use crate::cancel::{CancellationPolicy, RandomCancellation};
use crate::cluster::Coordinator;
use crate::config::SimConfig;
use crate::engine::{Engine, EngineError};
use crate::generator::RequestGenerator;
use crate::grid::{GridDims, OccupancyGrid};
use crate::model::*;
use crate::observability::*;
use crate::partition::Partition;
use crate::snapshot::Snapshot;

/// Summary of one full run, in the order the phases happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: Ulid,
    /// Seed used for generation and cancellation; `None` for caller-supplied inputs.
    pub seed: Option<u64>,
    pub workers: usize,
    pub background_seated: usize,
    pub live_confirmed: usize,
    pub waitlisted: usize,
    pub cancelled_segments: usize,
    pub cleared_per_worker: Vec<usize>,
    pub total_cleared: usize,
    pub final_occupied: usize,
    pub elapsed_ms: u64,
}

/// A finished run: its report and the merged grid.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    pub report: RunReport,
    pub grid: OccupancyGrid,
}

/// Drives one line through every phase: background bookings, live
/// resolution, cancellations, then the distributed waitlist pass.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    dims: GridDims,
    engine: Arc<Engine>,
    partition: Partition,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let dims = config.dims()?;
        let engine = Arc::new(Engine::new(config.threads)?);
        let partition = Partition::new(config.workers)?;
        Ok(Self {
            config,
            dims,
            engine,
            partition,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Generated run: background bookings and requests come from the seeded
    /// generator, cancellations are random per cell.
    pub async fn run(&self) -> Result<RunReport, EngineError> {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut generator = RequestGenerator::new(seed, self.dims);
        let background = generator.background_bookings(self.config.background_bookings);
        let requests = generator.requests(self.config.requests);
        let mut cancellation = RandomCancellation::new(seed.wrapping_add(1), self.config.cancel_one_in)?;

        let mut outcome = self.run_with(&background, &requests, &mut cancellation).await?;
        outcome.report.seed = Some(seed);
        Ok(outcome.report)
    }

    /// Run every phase over caller-supplied inputs. All requests are checked
    /// against the line before anything is booked.
    pub async fn run_with<P: CancellationPolicy>(
        &self,
        background: &[Request],
        requests: &[Request],
        cancellation: &mut P,
    ) -> Result<SimOutcome, EngineError> {
        for request in background.iter().chain(requests) {
            self.dims.check_request(request)?;
        }

        let run_id = Ulid::new();
        let started = Instant::now();
        info!("run {run_id}: {} requests over {} days, {} workers", requests.len(), self.dims.days, self.partition.workers());

        let mut grid = OccupancyGrid::new(self.dims);

        let phase = Instant::now();
        let background_seated = self.engine.book_background(&mut grid, background);
        record_phase("background", phase);
        info!("background: {background_seated} of {} bookings seated", background.len());

        let phase = Instant::now();
        let live = self.engine.resolve(&mut grid, requests);
        record_phase("live", phase);
        info!("live phase: {} confirmed, {} waitlisted", live.confirmed(), live.waitlist.len());

        let phase = Instant::now();
        let cancelled_segments = cancellation.cancel(&mut grid);
        record_phase("cancel", phase);

        let live_confirmed = live.confirmed();
        let waitlisted = live.waitlist.len();
        let coordinator = Coordinator::new(self.engine.clone(), self.partition);
        let distributed = coordinator
            .run(Snapshot {
                grid,
                waitlist: live.waitlist,
            })
            .await?;

        let final_occupied = distributed.merged.occupied_count();
        metrics::gauge!(FINAL_OCCUPIED_CELLS).set(final_occupied as f64);
        info!("final occupancy: {final_occupied} segments");

        let report = RunReport {
            run_id,
            seed: None,
            workers: self.partition.workers(),
            background_seated,
            live_confirmed,
            waitlisted,
            cancelled_segments,
            cleared_per_worker: distributed.cleared_per_worker(),
            total_cleared: distributed.total_cleared(),
            final_occupied,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        Ok(SimOutcome {
            report,
            grid: distributed.merged,
        })
    }
}

fn record_phase(phase: &'static str, started: Instant) {
    metrics::histogram!(PHASE_DURATION_SECONDS, "phase" => phase).record(started.elapsed().as_secs_f64());
}
