use crate::{error::SyncError, execution::factory};
use chrono::DateTime;
use chrono_tz::Tz;
use engine_config::settings::validated::ValidatedSettings;
use engine_core::{
    connectors::sink::PointSink, metrics::Metrics, watermark::WatermarkAdapter,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs the bridge until `cancel` fires.
pub async fn run(settings: ValidatedSettings, cancel: CancellationToken) -> Result<(), SyncError> {
    info!(
        source = %settings.dbf_path.display(),
        sink = %settings.influx.url,
        measurement = %settings.influx.measurement,
        process = %settings.process.name,
        "Starting meteoflux"
    );

    let metrics = Metrics::new();
    let mut scheduler = factory::create_scheduler(&settings, metrics.clone())?;
    scheduler.run(cancel).await?;

    let m = metrics.snapshot();
    info!(
        rows_extracted = m.rows_extracted,
        points_written = m.points_written,
        restarts = m.restarts,
        "Sync stopped"
    );
    Ok(())
}

/// Single attempt: ping the sink and read the newest stored timestamp.
pub async fn current_watermark(settings: &ValidatedSettings) -> Result<Option<DateTime<Tz>>, SyncError> {
    let sink = factory::create_sink(settings)?;
    sink.ping().await?;

    let adapter = WatermarkAdapter::new(sink, settings.timezone);
    Ok(adapter.last_timestamp(settings.measurement()).await?)
}
