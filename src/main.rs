use tracing::info;
use tracing_subscriber::EnvFilter;

use railgrid::config::SimConfig;
use railgrid::sim::Simulation;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sim = Simulation::new(SimConfig::from_env())?;
    let config = sim.config();
    let dims = sim.dims();
    railgrid::observability::init(config.metrics_port);

    info!("railgrid starting");
    info!("  line: {} stations ({} segments), {} seats, {} days", dims.stations(), dims.segments, dims.seats, dims.days);
    info!("  requests: {} (+{} background)", config.requests, config.background_bookings);
    info!("  workers: {}, threads per worker pool: {}", config.workers, config.threads);
    info!("  metrics: {}", config.metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let report = sim.run().await?;

    info!(
        "run {} done in {}ms: {} confirmed, {} waitlisted, {} cancelled, {} cleared {:?}, {} occupied",
        report.run_id,
        report.elapsed_ms,
        report.live_confirmed,
        report.waitlisted,
        report.cancelled_segments,
        report.total_cleared,
        report.cleared_per_worker,
        report.final_occupied
    );
    if sim.config().report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
