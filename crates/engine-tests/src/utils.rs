#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::{Europe::Prague, Tz};
use connectors::process::error::ProcessError;
use engine_core::{
    connectors::{sink::memory::MemorySink, source::RecordSource},
    error::SourceError,
    metrics::Metrics,
    supervisor::{MonitoredProcess, ProcessControl},
};
use engine_runtime::sync::scheduler::{SchedulerConfig, SyncComponents, SyncScheduler};
use model::{core::time::parse_station_time, records::row::RawField};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

pub const MEASUREMENT: &str = "winmeteo";
pub const STATION_TZ: Tz = Prague;

/// Station table held in memory. Clones share rows.
#[derive(Clone, Default)]
pub struct FakeSource {
    rows: Arc<Mutex<Vec<Vec<RawField>>>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row with `DAT`/`CAS` followed by `fields`.
    pub fn push(&self, date: &str, time: &str, fields: &[(&str, &str)]) {
        let mut row = vec![RawField::new("DAT", date), RawField::new("CAS", time)];
        row.extend(fields.iter().map(|(k, v)| RawField::new(*k, *v)));
        self.rows.lock().unwrap().push(row);
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn read_rows(&self) -> Result<Vec<Vec<RawField>>, SourceError> {
        if *self.failing.lock().unwrap() {
            return Err(SourceError::Unavailable("meteo.DBF is locked".into()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    fn describe(&self) -> String {
        "fake:meteo.DBF".into()
    }
}

#[derive(Debug, Default)]
pub struct ProcessState {
    pub alive: bool,
    /// Whether a kill actually brings the process down.
    pub dies_on_kill: bool,
    pub reject_kill: bool,
    pub launches: usize,
    pub kills: usize,
}

/// Process table with a single logger entry. Clones share state.
#[derive(Clone, Default)]
pub struct FakeProcessTable(pub Arc<Mutex<ProcessState>>);

impl FakeProcessTable {
    /// A running logger that exits when killed.
    pub fn running() -> Self {
        Self(Arc::new(Mutex::new(ProcessState {
            alive: true,
            dies_on_kill: true,
            ..Default::default()
        })))
    }

    /// A running logger that ignores kill signals.
    pub fn hung() -> Self {
        Self(Arc::new(Mutex::new(ProcessState {
            alive: true,
            dies_on_kill: false,
            ..Default::default()
        })))
    }

    pub fn launches(&self) -> usize {
        self.0.lock().unwrap().launches
    }

    pub fn kills(&self) -> usize {
        self.0.lock().unwrap().kills
    }

    pub fn is_alive(&self) -> bool {
        self.0.lock().unwrap().alive
    }
}

impl ProcessControl for FakeProcessTable {
    fn is_running(&mut self, _name: &str) -> bool {
        self.0.lock().unwrap().alive
    }

    fn launch(&mut self, _program: &Path, _working_dir: &Path) -> Result<(), ProcessError> {
        let mut state = self.0.lock().unwrap();
        state.launches += 1;
        state.alive = true;
        Ok(())
    }

    fn kill_all(&mut self, name: &str) -> Result<(), ProcessError> {
        let mut state = self.0.lock().unwrap();
        if state.reject_kill {
            return Err(ProcessError::KillRejected(name.to_string()));
        }
        state.kills += 1;
        if state.dies_on_kill {
            state.alive = false;
        }
        Ok(())
    }
}

/// Stock timing: poll 30 s, stall 180 s (six polls), kill wait 20 s, backoff 120 s.
pub fn scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        poll_interval: Duration::from_secs(30),
        error_backoff: Duration::from_secs(120),
        kill_wait: Duration::from_secs(20),
        stall_threshold: 180 / 30,
        measurement: MEASUREMENT.to_string(),
        timezone: STATION_TZ,
    }
}

pub fn logger() -> MonitoredProcess {
    MonitoredProcess {
        name: "WinMeteo.exe".into(),
        program: PathBuf::from("C:/WinMeteo/WinMeteo.exe"),
        working_dir: PathBuf::from("C:/WinMeteo"),
    }
}

pub struct Harness {
    pub scheduler: SyncScheduler,
    pub source: FakeSource,
    pub sink: Arc<MemorySink>,
    pub processes: FakeProcessTable,
    pub metrics: Metrics,
}

pub fn harness(processes: FakeProcessTable) -> Harness {
    let source = FakeSource::new();
    let sink = Arc::new(MemorySink::new());
    let metrics = Metrics::new();

    let scheduler = SyncScheduler::new(
        scheduler_config(),
        SyncComponents {
            source: Arc::new(source.clone()),
            sink: sink.clone(),
            watermarks: sink.clone(),
            process: Box::new(processes.clone()),
            target: logger(),
        },
        metrics.clone(),
    );

    Harness {
        scheduler,
        source,
        sink,
        processes,
        metrics,
    }
}

pub fn local(date: &str, time: &str) -> DateTime<Tz> {
    parse_station_time(date, time, STATION_TZ).unwrap()
}

pub fn utc(date: &str, time: &str) -> DateTime<Utc> {
    local(date, time).with_timezone(&Utc)
}
