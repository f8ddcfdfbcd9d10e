#![allow(dead_code)]

use flag_inspector::{Client, MapFlagSource, MemoryStorage, Value};
use log::kv::Key;
use log::{set_max_level, Level, Log, Metadata, Record};
use rand::distr::{Alphanumeric, SampleString};
use std::cell::RefCell;
use std::collections::HashMap;

pub fn rand_flag_key() -> String {
    format!("flag_{}", Alphanumeric.sample_string(&mut rand::rng(), 12))
}

pub fn rand_upstream(len: usize) -> HashMap<String, Value> {
    (0..len)
        .map(|_| (rand_flag_key(), Value::Bool(rand::random::<bool>())))
        .collect()
}

pub fn dev_client(upstream: HashMap<String, Value>, storage: &MemoryStorage) -> Client<MapFlagSource> {
    Client::builder(MapFlagSource::new(upstream))
        .dev_mode(true)
        .storage(Box::new(storage.clone()))
        .build()
        .unwrap()
}

pub struct RecordingLogger {}

impl RecordingLogger {
    thread_local!(pub static LOGS: RefCell<String> = RefCell::new(String::default()));
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().contains("flag_inspector")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let event_id = record
            .key_values()
            .get(Key::from("event_id"))
            .and_then(|v| v.to_i64())
            .unwrap_or(0);
        Self::LOGS.with_borrow_mut(|l| l.push_str(format!("{level} [{event_id}] {}\n", record.args()).as_str()));
    }

    fn flush(&self) {}
}

pub fn log_record_init() {
    set_max_level(log::LevelFilter::Info);
    _ = log::set_logger(&RecordingLogger {});
}
