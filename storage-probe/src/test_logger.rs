//! In-memory logger for asserting on emitted records.
//!
//! Tests run in parallel and share one global logger, so assertions filter
//! records by a value unique to the test.

use std::sync::{Mutex, Once};

use log::kv::{self, Key, Value, VisitSource};
use log::{Level, LevelFilter, Log, Metadata, Record};

#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub kvs: Vec<(String, String)>,
}

impl Captured {
    pub fn kv(&self, key: &str) -> Option<&str> {
        self.kvs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.kvs.iter().any(|(_, v)| v.contains(needle))
    }
}

static RECORDS: Mutex<Vec<Captured>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

struct CaptureLogger;

struct Collect(Vec<(String, String)>);

impl<'kvs> VisitSource<'kvs> for Collect {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.0.push((key.as_str().to_string(), value.to_string()));
        Ok(())
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut kvs = Collect(Vec::new());
        let _ = record.key_values().visit(&mut kvs);

        RECORDS.lock().unwrap().push(Captured {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            kvs: kvs.0,
        });
    }

    fn flush(&self) {}
}

pub(crate) fn init() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger installed in unit tests");
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Records emitted by this crate that mention `needle`.
pub(crate) fn records_mentioning(needle: &str) -> Vec<Captured> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.target.starts_with("storage_probe") && r.mentions(needle))
        .cloned()
        .collect()
}
