use crate::{
    error::{CycleError, SyncError},
    sync::state::LoopState,
};
use chrono::Utc;
use chrono_tz::Tz;
use engine_config::settings::validated::ValidatedSettings;
use engine_core::{
    connectors::{
        sink::{PointSink, WatermarkStore},
        source::RecordSource,
    },
    extract::RecordExtractor,
    metrics::Metrics,
    retry::{Cancelled, RetryPolicy},
    supervisor::{MonitoredProcess, ProcessControl, ProcessSupervisor, Termination},
    watermark::WatermarkAdapter,
    writer::SinkWriter,
};
use model::{core::time::Watermark, records::batch::latest_timestamp};
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
    pub error_backoff: Duration,
    pub kill_wait: Duration,
    /// Consecutive empty polls that trigger a restart.
    pub stall_threshold: u32,
    pub measurement: String,
    pub timezone: Tz,
}

impl From<&ValidatedSettings> for SchedulerConfig {
    fn from(settings: &ValidatedSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            error_backoff: settings.error_backoff(),
            kill_wait: settings.kill_wait(),
            stall_threshold: settings.stall_threshold,
            measurement: settings.measurement().to_string(),
            timezone: settings.timezone,
        }
    }
}

/// Collaborators the scheduler drives.
pub struct SyncComponents {
    pub source: Arc<dyn RecordSource>,
    pub sink: Arc<dyn PointSink>,
    pub watermarks: Arc<dyn WatermarkStore>,
    pub process: Box<dyn ProcessControl>,
    pub target: MonitoredProcess,
}

/// What a successful cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub rows: usize,
    pub points: usize,
    pub restarted: bool,
}

/// Owns the watermark and loop counters. One connect phase, then cycles
/// until cancelled.
pub struct SyncScheduler {
    config: SchedulerConfig,
    sink: Arc<dyn PointSink>,
    extractor: RecordExtractor,
    writer: SinkWriter,
    watermarks: WatermarkAdapter,
    supervisor: ProcessSupervisor,
    metrics: Metrics,
    watermark: Watermark,
    state: LoopState,
}

impl SyncScheduler {
    pub fn new(config: SchedulerConfig, components: SyncComponents, metrics: Metrics) -> Self {
        let tz = config.timezone;
        let writer = SinkWriter::new(
            components.sink.clone(),
            config.measurement.clone(),
            metrics.clone(),
        );

        Self {
            extractor: RecordExtractor::new(components.source, tz),
            watermarks: WatermarkAdapter::new(components.watermarks, tz),
            supervisor: ProcessSupervisor::new(components.process, components.target),
            sink: components.sink,
            writer,
            metrics,
            watermark: Watermark::beginning(tz),
            state: LoopState::new(Utc::now().with_timezone(&tz)),
            config,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn watermark(&self) -> &Watermark {
        &self.watermark
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Starts the logger if it is not already up. Never fails the bridge.
    pub fn start_logger(&mut self) {
        let name = self.supervisor.target().name.clone();
        match self.supervisor.ensure_running() {
            Ok(true) => {}
            Ok(false) => info!(process = %name, "{name} is already running"),
            Err(e) => error!(process = %name, error = %e, "Failed to start {name}"),
        }
    }

    /// Pings the sink and seeds the watermark, retrying every error-backoff
    /// interval until it succeeds or `cancel` fires.
    pub async fn connect(&mut self, cancel: &CancellationToken) -> Result<(), SyncError> {
        let backoff = self.config.error_backoff;
        let policy = RetryPolicy::fixed(backoff);
        let sink = self.sink.as_ref();
        let watermarks = &self.watermarks;
        let measurement = self.config.measurement.as_str();

        let result = policy
            .run(
                || connect_once(sink, watermarks, measurement),
                |e, attempt| {
                    error!(attempt = attempt + 1, error = %e, "Failed to connect to sink");
                    info!("Waiting {} seconds before retrying", backoff.as_secs());
                },
                cancel,
            )
            .await;

        match result {
            Ok(watermark) => {
                info!(watermark = %watermark, "Connected, last stored point at {watermark}");
                self.watermark = watermark;
                Ok(())
            }
            Err(Cancelled) => Err(SyncError::ShutdownRequested),
        }
    }

    /// One extract → write → stall check pass. On error the watermark and
    /// counters keep whatever the failed pass had reached.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        self.state.iterations += 1;
        self.log_stats();

        let records = self.extractor.extract(&self.watermark).await?;
        self.metrics.increment_rows(records.len() as u64);

        let mut outcome = CycleOutcome {
            rows: records.len(),
            points: 0,
            restarted: false,
        };

        if records.is_empty() {
            self.state.zeros += 1;
        } else {
            outcome.points = self.writer.write_batch(&records).await?;
            if let Some(latest) = latest_timestamp(&records) {
                self.watermark.advance(latest);
            }
            self.state.zeros = 0;
            info!(rows = outcome.rows, points = outcome.points, watermark = %self.watermark, "Wrote {} rows", outcome.rows);
        }

        if self.state.zeros >= self.config.stall_threshold {
            self.restart_logger().await?;
            outcome.restarted = true;
        }

        Ok(outcome)
    }

    async fn restart_logger(&mut self) -> Result<(), CycleError> {
        warn!(
            zeros = self.state.zeros,
            "No new rows for {} polls, restarting logger", self.state.zeros
        );

        if let Termination::KillFailed(e) = self.supervisor.terminate(self.config.kill_wait).await? {
            warn!(error = %e, "Kill request failed, starting logger anyway");
        }
        self.supervisor.ensure_running()?;

        self.state
            .record_restart(Utc::now().with_timezone(&self.config.timezone));
        self.metrics.increment_restarts(1);
        Ok(())
    }

    /// Connect phase, then cycles until `cancel` fires.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), SyncError> {
        self.start_logger();

        match self.connect(&cancel).await {
            Ok(()) => {}
            Err(SyncError::ShutdownRequested) => {
                info!("Shutdown requested before connecting");
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        loop {
            let pause = match self.run_cycle().await {
                Ok(_) => self.config.poll_interval,
                Err(e) => {
                    self.metrics.increment_failed_cycles(1);
                    error!(
                        iteration = self.state.iterations,
                        restarts = self.state.restarts,
                        error = %e,
                        "Cycle failed"
                    );
                    info!("Waiting {} seconds before retrying", self.config.error_backoff.as_secs());
                    self.config.error_backoff
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(iteration = self.state.iterations, "Shutdown requested, stopping sync");
                    return Ok(());
                }
                _ = sleep(pause) => {}
            }
        }
    }

    fn log_stats(&self) {
        let m = self.metrics.snapshot();
        info!(
            iteration = self.state.iterations,
            restarts = self.state.restarts,
            last_restart = %self.state.last_restart,
            rows_extracted = m.rows_extracted,
            points_written = m.points_written,
            unknown_fields = m.unknown_fields,
            dropped_fields = m.dropped_fields,
            failed_cycles = m.failed_cycles,
            "STATS: iteration {}, restarts {}, last (re)start {}",
            self.state.iterations,
            self.state.restarts,
            self.state.last_restart.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

async fn connect_once(
    sink: &dyn PointSink,
    watermarks: &WatermarkAdapter,
    measurement: &str,
) -> Result<Watermark, CycleError> {
    sink.ping().await?;
    Ok(watermarks.initial_watermark(measurement).await?)
}
