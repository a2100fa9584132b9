use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, info};

use crate::engine::{Engine, EngineError};
use crate::grid::OccupancyGrid;
use crate::model::*;
use crate::partition::{resolve_owned_detailed, Partition};
use crate::snapshot::{self, Snapshot};

/// Per-worker summary of the distributed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WorkerReport {
    pub worker: WorkerId,
    /// Waitlisted requests this worker owned.
    pub owned: usize,
    pub cleared: usize,
    /// Owned requests that still did not fit and were dropped.
    pub unresolved: usize,
}

#[derive(Debug, Clone)]
pub struct DistributedOutcome {
    /// OR of every worker's final grid.
    pub merged: OccupancyGrid,
    /// One report per worker, ordered by worker id.
    pub reports: Vec<WorkerReport>,
}

impl DistributedOutcome {
    pub fn cleared_per_worker(&self) -> Vec<usize> {
        self.reports.iter().map(|r| r.cleared).collect()
    }

    pub fn total_cleared(&self) -> usize {
        self.reports.iter().map(|r| r.cleared).sum()
    }
}

/// Merge per-worker grids with element-wise OR.
///
/// OR is commutative, associative and idempotent, so the result does not
/// depend on the order grids arrive in. At least one grid is required.
pub fn reduce<I>(grids: I) -> Result<OccupancyGrid, EngineError>
where
    I: IntoIterator<Item = OccupancyGrid>,
{
    let mut grids = grids.into_iter();
    let mut merged = grids.next().ok_or(EngineError::NoWorkerGrids)?;
    for grid in grids {
        merged.merge_from(&grid)?;
    }
    Ok(merged)
}

/// Replicates the live-phase snapshot to every worker, runs each worker's
/// partition, and reduces their grids into one.
///
/// Workers share nothing mutable: each decodes its own copy of the grid and
/// waitlist from one immutable frame, so every worker starts from the same
/// bytes. The only synchronization points are the frame being fully built
/// before any worker starts, and the reduction waiting for all of them.
/// Each run keeps its own results, so concurrent runs on one coordinator do
/// not see each other.
pub struct Coordinator {
    engine: Arc<Engine>,
    partition: Partition,
}

impl Coordinator {
    pub fn new(engine: Arc<Engine>, partition: Partition) -> Self {
        Self { engine, partition }
    }

    pub fn workers(&self) -> usize {
        self.partition.workers()
    }

    /// Encode `snapshot` once and hand every worker a view of the same frame.
    /// Decoding a replica yields that worker's private copy.
    pub fn replicate(&self, snapshot: &Snapshot) -> Result<Vec<Bytes>, EngineError> {
        let frame = snapshot::encode(snapshot)?;
        Ok(vec![frame; self.workers()])
    }

    /// Run the distributed phase. Takes ownership of the live-phase snapshot:
    /// after this call the only grids are the workers' copies and the merge.
    pub async fn run(&self, snapshot: Snapshot) -> Result<DistributedOutcome, EngineError> {
        let started = Instant::now();
        let replicas = self.replicate(&snapshot)?;
        drop(snapshot);

        if let Some(frame) = replicas.first() {
            let checksum = snapshot::stored_checksum(frame)?;
            metrics::histogram!(crate::observability::SNAPSHOT_FRAME_BYTES).record(frame.len() as f64);
            info!(
                "replicating {} byte snapshot (crc {checksum:#010x}) to {} workers",
                frame.len(),
                self.workers()
            );
        }

        let tasks = replicas.into_iter().enumerate().map(|(worker, frame)| {
            let engine = self.engine.clone();
            let partition = self.partition;
            tokio::task::spawn_blocking(move || run_worker(&engine, worker, &partition, &frame))
        });

        // Reduction barrier: every worker must finish before merging.
        let results = futures::future::join_all(tasks).await;
        let mut grids = Vec::with_capacity(results.len());
        let mut reports = Vec::with_capacity(results.len());
        for (worker, result) in results.into_iter().enumerate() {
            let (grid, report) = result.map_err(|e| EngineError::WorkerFailed {
                worker,
                reason: e.to_string(),
            })??;
            grids.push(grid);
            reports.push(report);
        }

        let merged = reduce(grids)?;

        metrics::histogram!(crate::observability::PHASE_DURATION_SECONDS, "phase" => "distributed")
            .record(started.elapsed().as_secs_f64());
        debug!(
            "reduced {} worker grids: {} occupied segments",
            reports.len(),
            merged.occupied_count()
        );
        Ok(DistributedOutcome { merged, reports })
    }
}

/// One worker: decode a private copy, resolve the owned share of the
/// waitlist, hand back the mutated grid.
fn run_worker(
    engine: &Engine,
    worker: WorkerId,
    partition: &Partition,
    frame: &Bytes,
) -> Result<(OccupancyGrid, WorkerReport), EngineError> {
    let Snapshot { mut grid, waitlist } = snapshot::decode(frame)?;
    let resolution = resolve_owned_detailed(engine, worker, partition, &mut grid, &waitlist)?;
    let report = WorkerReport {
        worker,
        owned: resolution.outcomes.len(),
        cleared: resolution.cleared(),
        unresolved: resolution.unresolved(),
    };
    metrics::counter!(crate::observability::WAITLIST_CLEARED_TOTAL, "worker" => worker.to_string())
        .increment(report.cleared as u64);
    info!("worker {worker} cleared {} of {} owned waitlist requests", report.cleared, report.owned);
    Ok((grid, report))
}
