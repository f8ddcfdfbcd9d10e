use flag_inspector::*;
use log::kv::Key as LogKey;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    // Debug level logging shows every override change.
    log::set_max_level(LevelFilter::Debug);
    log::set_logger(&PrintLog {}).unwrap();

    let client = Client::builder(MapFlagSource::from([
        ("dark_mode", Value::Bool(false)),
        ("new_checkout", Value::Bool(true)),
        ("theme", Value::String("blue".to_owned())),
    ]))
    .dev_mode(true)
    .build()
    .unwrap();

    let client = client.wait_for_ready(Duration::from_secs(5)).await.unwrap();

    client.subscribe(Box::new(|delta| {
        println!("changed: {delta:?}");
        Ok(())
    }));

    let mut inspector = client.inspector().unwrap();
    let now = Instant::now();
    inspector.handle_key(Key::Control, now);
    inspector.handle_key(Key::Control, now + Duration::from_millis(120));

    inspector.toggle("dark_mode").unwrap();
    println!("{}", inspector.render().unwrap_or_default());

    println!("dark_mode: {}", client.get_bool_value("dark_mode", false));

    inspector.reset_all().unwrap();
    println!("{}", inspector.render().unwrap_or_default());
}

// Example log implementation.
pub struct PrintLog {}

impl Log for PrintLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().contains("flag_inspector")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        match record.key_values().get(LogKey::from("event_id")) {
            Some(event_id) => println!("{level} [{event_id}] {}", record.args()),
            None => println!("{level} {}", record.args()),
        }
    }

    fn flush(&self) {}
}
