//! Prefix scan behaviour against an on-disk store.

use chrono::{Duration, TimeZone, Utc};
use hearth_core::Category;
use hearth_state::key::{self, Timestamp};
use hearth_state::Store;

fn disk_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path(), &Category::ALL).unwrap();
    (dir, store)
}

/// Deterministic spread of timestamps, deliberately written out of order.
fn shuffled_timestamps(count: u64) -> Vec<Timestamp> {
    let base = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let offset = (i * 7_919) % (count * 13) * 37;
            Timestamp::new(base + Duration::seconds(offset as i64)).unwrap()
        })
        .collect()
}

#[test]
fn scenario_utilization_channel_in_order() {
    let (_dir, store) = disk_store();
    store
        .put(Category::Utilization, "NT01T0220250725T103258Z", "75")
        .unwrap();
    store
        .put(Category::Utilization, "NT01T0220250725T112658Z", "74")
        .unwrap();

    let entries: Vec<(String, String)> = store
        .scan_by_prefix(Category::Utilization, "NT01T02")
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            (e.key, e.value)
        })
        .collect();

    assert_eq!(
        entries,
        vec![
            ("NT01T0220250725T103258Z".to_string(), "75".to_string()),
            ("NT01T0220250725T112658Z".to_string(), "74".to_string()),
        ]
    );
}

#[test]
fn scenario_namespaces_do_not_leak() {
    let (_dir, store) = disk_store();
    store
        .put(Category::Alarm, "LB01O0120250725T134509Z", "1")
        .unwrap();
    store
        .put(Category::Notification, "NT01N0120250725T103258Z", "msg")
        .unwrap();

    let alarm: Vec<String> = store
        .scan_by_prefix(Category::Alarm, "LB01O01")
        .unwrap()
        .map(|e| e.unwrap().key)
        .collect();
    assert_eq!(alarm, vec!["LB01O0120250725T134509Z"]);

    let leaked = store
        .scan_by_prefix(Category::Alarm, "NT01N01")
        .unwrap()
        .count();
    assert_eq!(leaked, 0);
}

#[test]
fn scan_is_chronological_and_prefix_bounded() {
    let (_dir, store) = disk_store();
    let neighbours = [("NT01", "T01"), ("NT01", "T03"), ("NT02", "T02"), ("NS01", "T02")];

    for (i, ts) in shuffled_timestamps(200).iter().enumerate() {
        let key = key::encode("NT01", "T02", ts).unwrap();
        store
            .put(Category::Utilization, &key, &i.to_string())
            .unwrap();
        let (asset, channel) = neighbours[i % neighbours.len()];
        let other = key::encode(asset, channel, ts).unwrap();
        store.put(Category::Utilization, &other, "noise").unwrap();
    }

    let records = store
        .scan_by_prefix_ordered(Category::Utilization, "NT01T02")
        .unwrap();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.key.starts_with("NT01T02")));
    assert!(records.iter().all(|r| r.value != "noise"));
    assert!(records.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn rewriting_a_key_keeps_only_latest_value() {
    let (_dir, store) = disk_store();
    let key = "NT01T0220250725T103258Z";
    store.put(Category::Utilization, "NT01T0120250725T103258Z", "68").unwrap();
    store.put(Category::Utilization, key, "75").unwrap();
    store.put(Category::Utilization, key, "80").unwrap();

    let values: Vec<String> = store
        .scan_by_prefix(Category::Utilization, "NT01T02")
        .unwrap()
        .map(|e| e.unwrap().value)
        .collect();
    assert_eq!(values, vec!["80"]);
    assert_eq!(
        store.get(Category::Utilization, "NT01T0120250725T103258Z").unwrap().as_deref(),
        Some("68")
    );
    assert_eq!(store.namespaces(), &Category::ALL);
}

#[test]
fn empty_namespace_scans_empty() {
    let (_dir, store) = disk_store();
    assert_eq!(store.scan_by_prefix(Category::Notification, "NT01N01").unwrap().count(), 0);
    assert!(store
        .scan_by_prefix_ordered(Category::Notification, "NT01N01")
        .unwrap()
        .is_empty());
}

#[test]
fn suffix_decodes_back_to_written_timestamp() {
    for ts in shuffled_timestamps(50) {
        let key = key::encode("LB01", "O01", &ts).unwrap();
        let prefix = key::prefix("LB01", "O01").unwrap();
        assert_eq!(key::decode_suffix(&key, prefix.len()).unwrap(), ts);
    }
}

#[test]
fn scan_survives_concurrent_writers() {
    let (_dir, store) = disk_store();
    for ts in shuffled_timestamps(20) {
        let key = key::encode("NT01", "T02", &ts).unwrap();
        store.put(Category::Utilization, &key, "1").unwrap();
    }

    std::thread::scope(|s| {
        let writer = store.clone();
        s.spawn(move || {
            let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
            for i in 0..20 {
                let ts = Timestamp::new(later + Duration::minutes(i)).unwrap();
                let key = key::encode("NT01", "T02", &ts).unwrap();
                writer.put(Category::Utilization, &key, "2").unwrap();
            }
        });
        for _ in 0..5 {
            let records = store
                .scan_by_prefix_ordered(Category::Utilization, "NT01T02")
                .unwrap();
            assert!(records.len() >= 20);
            assert!(records.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        }
    });
}
