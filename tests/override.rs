use crate::utils::{dev_client, rand_flag_key, rand_upstream};
use flag_inspector::{Client, FileStorage, FlagDelta, FlagSource, MapFlagSource, MemoryStorage, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mod utils;

fn record(client: &Client<MapFlagSource>) -> Arc<Mutex<Vec<FlagDelta>>> {
    let deltas = Arc::new(Mutex::new(Vec::new()));
    let d = Arc::clone(&deltas);
    client.subscribe(Box::new(move |delta| {
        d.lock().unwrap().push(delta.clone());
        Ok(())
    }));
    deltas
}

#[test]
fn set_wins_regardless_of_upstream() {
    let upstream = rand_upstream(16);
    let client = dev_client(upstream.clone(), &MemoryStorage::new());

    for (key, value) in upstream.iter() {
        let forced = !value.as_bool().unwrap();
        client.set(key, Value::Bool(forced)).unwrap();

        let mut any = upstream.clone();
        assert_eq!(client.merge(&any)[key], Value::Bool(forced));
        any.insert(key.clone(), Value::Bool(!forced));
        assert_eq!(client.merge(&any)[key], Value::Bool(forced));
        assert_eq!(client.get_all_values()[key], Value::Bool(forced));
        assert_eq!(client.get_bool_value(key, !forced), forced);
    }
}

#[test]
fn unset_restores_upstream() {
    let upstream = rand_upstream(16);
    let client = dev_client(upstream.clone(), &MemoryStorage::new());

    for key in upstream.keys() {
        client.set(key, Value::Bool(true)).unwrap();
        client.unset(key).unwrap();
        assert_eq!(client.merge(&upstream)[key], upstream[key]);
        assert!(!client.is_overridden(key));
    }
}

#[test]
fn unset_all_clears_every_override() {
    let upstream = rand_upstream(16);
    let client = dev_client(upstream.clone(), &MemoryStorage::new());
    for key in upstream.keys() {
        client.set(key, Value::Bool(rand::random::<bool>())).unwrap();
    }
    let extra = rand_flag_key();
    client.set(&extra, Value::Bool(true)).unwrap();

    client.unset_all().unwrap();

    assert!(upstream.keys().all(|k| !client.is_overridden(k)));
    assert!(!client.is_overridden(&extra));
    assert_eq!(client.merge(&upstream), upstream);
    assert_eq!(client.get_all_values(), upstream);
}

#[test]
fn unset_without_override_notifies_upstream_value() {
    let upstream = HashMap::from([("dark_mode".to_owned(), Value::Bool(true))]);
    let client = dev_client(upstream, &MemoryStorage::new());
    let deltas = record(&client);

    client.unset("dark_mode").unwrap();

    assert!(client.store().unwrap().overrides().is_empty());
    assert_eq!(
        *deltas.lock().unwrap(),
        vec![FlagDelta::from([("dark_mode".to_owned(), Value::Bool(true))])]
    );
}

#[test]
fn unset_adopts_upstream_changes() {
    let client = dev_client(
        HashMap::from([("dark_mode".to_owned(), Value::Bool(false))]),
        &MemoryStorage::new(),
    );
    let deltas = record(&client);

    client.set("dark_mode", Value::Bool(true)).unwrap();
    client.upstream().update("dark_mode", Value::Bool(true));
    client.unset("dark_mode").unwrap();

    let deltas = deltas.lock().unwrap();
    assert_eq!(deltas[1]["dark_mode"], Value::Bool(true));
}

#[test]
fn overrides_survive_restart() {
    let storage = MemoryStorage::new();
    let upstream = rand_upstream(8);
    let expected = {
        let client = dev_client(upstream.clone(), &storage);
        for key in upstream.keys().take(4) {
            client.set(key, Value::Bool(rand::random::<bool>())).unwrap();
        }
        client.set("limit", Value::Int(12)).unwrap();
        client.set("label", Value::from("beta")).unwrap();
        client.store().unwrap().overrides()
    };

    let restarted = dev_client(upstream, &storage);

    assert_eq!(restarted.store().unwrap().overrides(), expected);
    assert_eq!(restarted.get_int_value("limit", 0), 12);
    assert_eq!(restarted.get_str_value("label", String::new()), "beta");
}

#[test]
fn overrides_survive_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let build = || {
        Client::builder(MapFlagSource::from([("dark_mode", Value::Bool(false))]))
            .dev_mode(true)
            .storage(Box::new(FileStorage::new(dir.path()).unwrap()))
            .build()
            .unwrap()
    };

    build().set("dark_mode", Value::Bool(true)).unwrap();

    let restarted = build();
    assert!(restarted.is_overridden("dark_mode"));
    assert!(restarted.get_bool_value("dark_mode", false));

    restarted.unset_all().unwrap();
    assert!(!build().is_overridden("dark_mode"));
}

#[test]
fn custom_overrides_key() {
    let storage = MemoryStorage::new();
    let client = Client::builder(MapFlagSource::from([("dark_mode", Value::Bool(false))]))
        .dev_mode(true)
        .storage(Box::new(storage.clone()))
        .overrides_key("my-app-overrides")
        .build()
        .unwrap();

    client.set("dark_mode", Value::Bool(true)).unwrap();

    assert_eq!(
        flag_inspector::OverrideStorage::read(&storage, "my-app-overrides").unwrap(),
        r#"{"dark_mode":true}"#
    );
}
