use crate::utils::{dev_client, log_record_init, RecordingLogger};
use flag_inspector::{
    Client, ErrorKind, FileFlagSource, FlagDelta, FlagSource, Inspector, MapFlagSource, MemoryStorage, OverrideStorage,
    Value,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

mod utils;

#[tokio::test]
async fn wait_for_ready_resolves_once() {
    let client = Client::builder(MapFlagSource::pending(HashMap::from([("flag".to_owned(), Value::Bool(true))])))
        .dev_mode(true)
        .build()
        .unwrap();
    let client = Arc::new(client);

    let waiter = Arc::clone(&client);
    let handle = tokio::spawn(async move { waiter.wait_for_ready(Duration::from_secs(5)).await.is_ok() });
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.upstream().mark_ready();

    assert!(handle.await.unwrap());
    let ready = client.wait_for_ready(Duration::from_millis(1)).await.unwrap();
    assert!(std::ptr::eq(ready, client.as_ref()));
    assert!(ready.get_bool_value("flag", false));
}

#[tokio::test]
async fn wait_for_ready_times_out() {
    log_record_init();
    let client = Client::builder(MapFlagSource::pending(HashMap::new())).dev_mode(false).build().unwrap();

    let err = client.wait_for_ready(Duration::from_millis(50)).await.err().unwrap();

    assert_eq!(err.kind, ErrorKind::ClientInitTimedOut);
    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("WARNING [4200] Flag source was not ready after 50ms."));
}

#[test]
fn failing_subscriber_does_not_block_others() {
    let client = dev_client(HashMap::from([("dark_mode".to_owned(), Value::Bool(false))]), &MemoryStorage::new());
    let delivered = Arc::new(AtomicUsize::new(0));
    client.subscribe(Box::new(|_| Err("first subscriber failed".into())));
    let d = Arc::clone(&delivered);
    client.subscribe(Box::new(move |_| {
        d.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }));

    let err = client.set("dark_mode", Value::Bool(true)).err().unwrap();

    assert_eq!(err.kind, ErrorKind::SubscriberFailure);
    assert!(err.message.contains("first subscriber failed"));
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
    assert!(client.get_bool_value("dark_mode", false));
}

#[test]
fn corrupt_snapshot_is_logged_and_ignored() {
    log_record_init();
    let storage = MemoryStorage::new();
    storage.write("flag-overrides", "{not json").unwrap();

    let client = dev_client(HashMap::from([("dark_mode".to_owned(), Value::Bool(false))]), &storage);

    assert!(client.store().unwrap().overrides().is_empty());
    assert!(!client.get_bool_value("dark_mode", true));
    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("WARNING [3100] Persisted flag overrides are unreadable"));
}

#[test]
fn type_mismatch_is_logged() {
    log_record_init();
    let client = dev_client(HashMap::from([("limit".to_owned(), Value::Int(3))]), &MemoryStorage::new());

    assert!(!client.get_bool_value("limit", false));

    let logs = RecordingLogger::LOGS.take();
    assert!(logs.contains("ERROR [2002] The type of a flag must match the requested type. Flag 'limit' has a 'Int' value but the requested type was 'bool'."));
}

#[test]
fn pass_through_outside_dev_mode() {
    let storage = MemoryStorage::new();
    storage.write("flag-overrides", r#"{"dark_mode":true}"#).unwrap();
    let client = Client::builder(MapFlagSource::from([("dark_mode", Value::Bool(false))]))
        .dev_mode(false)
        .storage(Box::new(storage.clone()))
        .build()
        .unwrap();

    assert!(!client.get_bool_value("dark_mode", true));
    client.set("dark_mode", Value::Bool(true)).unwrap();
    assert!(!client.get_bool_value("dark_mode", true));
    assert!(client.inspector().is_none());
    assert_eq!(storage.read("flag-overrides").unwrap(), r#"{"dark_mode":true}"#);
}

#[test]
fn wraps_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    std::fs::write(&path, r#"{"flags": {"dark_mode": false, "theme": "blue"}}"#).unwrap();
    let client = Client::builder(FileFlagSource::new(path.to_str().unwrap()).unwrap())
        .dev_mode(true)
        .build()
        .unwrap();

    client.set("theme", Value::from("red")).unwrap();

    let all = client.get_all_values();
    assert_eq!(all["dark_mode"], Value::Bool(false));
    assert_eq!(all["theme"], Value::from("red"));
    assert_eq!(client.upstream().get_value("theme", Value::from("")), Value::from("blue"));
}

#[test]
fn client_is_a_flag_source() {
    fn evaluate(source: &dyn FlagSource) -> Value {
        source.get_value("dark_mode", Value::Bool(false))
    }

    let client = dev_client(HashMap::from([("dark_mode".to_owned(), Value::Bool(false))]), &MemoryStorage::new());
    client.set("dark_mode", Value::Bool(true)).unwrap();

    assert_eq!(evaluate(&client), Value::Bool(true));
    assert_eq!(evaluate(client.upstream()), Value::Bool(false));
}

#[test]
fn subscribing_inside_a_subscriber() {
    let client = Arc::new(dev_client(
        HashMap::from([("dark_mode".to_owned(), Value::Bool(false))]),
        &MemoryStorage::new(),
    ));
    let late = Arc::new(Mutex::new(Vec::<FlagDelta>::new()));
    let opened = Arc::new(Mutex::new(None::<Inspector>));
    let first = Arc::new(AtomicBool::new(true));
    let (weak, l, o) = (Arc::downgrade(&client), Arc::clone(&late), Arc::clone(&opened));
    client.subscribe(Box::new(move |_| {
        if !first.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(client) = weak.upgrade() {
            *o.lock().unwrap() = client.inspector();
            let l = Arc::clone(&l);
            client.subscribe(Box::new(move |d| {
                l.lock().unwrap().push(d.clone());
                Ok(())
            }));
        }
        Ok(())
    }));

    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(&client);
    thread::spawn(move || {
        let _ = tx.send(worker.set("dark_mode", Value::Bool(true)));
    });
    let result = rx.recv_timeout(Duration::from_secs(3)).expect("set did not return");
    assert!(result.is_ok());
    assert!(late.lock().unwrap().is_empty());

    client.set("dark_mode", Value::Bool(false)).unwrap();

    assert_eq!(
        *late.lock().unwrap(),
        vec![FlagDelta::from([("dark_mode".to_owned(), Value::Bool(false))])]
    );
    let mut inspector = opened.lock().unwrap().take().unwrap();
    inspector.open();
    assert_eq!(inspector.rows()[0].status(), "Off, Forced");
}
