use std::net::SocketAddr;

// ── Request outcomes ────────────────────────────────────────────

/// Counter: requests confirmed during the live phase.
pub const REQUESTS_CONFIRMED_TOTAL: &str = "railgrid_requests_confirmed_total";

/// Counter: requests that found no seat during the live phase.
pub const REQUESTS_WAITLISTED_TOTAL: &str = "railgrid_requests_waitlisted_total";

/// Counter: waitlisted requests cleared in the distributed phase. Labels: worker.
pub const WAITLIST_CLEARED_TOTAL: &str = "railgrid_waitlist_cleared_total";

/// Counter: segments freed by cancellations.
pub const SEGMENTS_CANCELLED_TOTAL: &str = "railgrid_segments_cancelled_total";

// ── Run shape ───────────────────────────────────────────────────

/// Histogram: size in bytes of the snapshot frame sent to workers.
pub const SNAPSHOT_FRAME_BYTES: &str = "railgrid_snapshot_frame_bytes";

/// Histogram: phase duration in seconds. Labels: phase.
pub const PHASE_DURATION_SECONDS: &str = "railgrid_phase_duration_seconds";

/// Gauge: occupied cells in the merged grid after the last run.
pub const FINAL_OCCUPIED_CELLS: &str = "railgrid_final_occupied_cells";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    if let Err(e) = metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        tracing::error!("failed to install Prometheus metrics exporter: {e}");
        return;
    }
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
