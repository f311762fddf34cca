use crate::{
    error::SyncError,
    sync::scheduler::{SchedulerConfig, SyncComponents, SyncScheduler},
};
use connectors::{influx::client::InfluxClient, process::table::ProcessTable};
use engine_config::settings::validated::ValidatedSettings;
use engine_core::{
    connectors::{
        sink::influx::InfluxSink,
        source::{DbfSource, RecordSource},
    },
    metrics::Metrics,
};
use std::sync::Arc;

pub fn create_sink(settings: &ValidatedSettings) -> Result<Arc<InfluxSink>, SyncError> {
    let client = InfluxClient::new(settings.influx.clone())?;
    Ok(Arc::new(InfluxSink::new(client)))
}

pub fn create_source(settings: &ValidatedSettings) -> Arc<dyn RecordSource> {
    Arc::new(DbfSource::new(settings.dbf_path.clone()))
}

/// Wires the DBF source, InfluxDB sink and OS process table into a scheduler.
pub fn create_scheduler(
    settings: &ValidatedSettings,
    metrics: Metrics,
) -> Result<SyncScheduler, SyncError> {
    let sink = create_sink(settings)?;
    let components = SyncComponents {
        source: create_source(settings),
        sink: sink.clone(),
        watermarks: sink,
        process: Box::new(ProcessTable::new()),
        target: settings.process.clone(),
    };

    Ok(SyncScheduler::new(
        SchedulerConfig::from(settings),
        components,
        metrics,
    ))
}
