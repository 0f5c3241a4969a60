use quill_settings::SettingsStore;
use serde_json::json;

#[test]
fn get_missing_key_returns_none() {
    let store = SettingsStore::open_in_memory().unwrap();
    assert!(store.get("nope").unwrap().is_none());
}

#[test]
fn set_then_get_roundtrip() {
    let store = SettingsStore::open_in_memory().unwrap();
    let value = json!({ "title": "My Blog", "posts_per_page": 10 });
    store.set("site_config", &value).unwrap();
    assert_eq!(store.get("site_config").unwrap(), Some(value));
}

#[test]
fn set_overwrites_existing_value() {
    let store = SettingsStore::open_in_memory().unwrap();
    store.set("theme", &json!("light")).unwrap();
    store.set("theme", &json!("dark")).unwrap();
    assert_eq!(store.get("theme").unwrap(), Some(json!("dark")));
}

#[test]
fn set_twice_with_same_value_is_idempotent() {
    let store = SettingsStore::open_in_memory().unwrap();
    let value = json!({ "region": "us-east-1" });
    store.set("aws_config", &value).unwrap();
    store.set("aws_config", &value).unwrap();
    assert_eq!(store.get("aws_config").unwrap(), Some(value));
}

#[test]
fn keys_are_independent() {
    let store = SettingsStore::open_in_memory().unwrap();
    store.set("a", &json!(1)).unwrap();
    store.set("b", &json!(2)).unwrap();
    assert_eq!(store.get("a").unwrap(), Some(json!(1)));
    assert_eq!(store.get("b").unwrap(), Some(json!(2)));
}

#[test]
fn delete_removes_key() {
    let store = SettingsStore::open_in_memory().unwrap();
    store.set("gone", &json!(true)).unwrap();
    assert!(store.delete("gone").unwrap());
    assert!(store.get("gone").unwrap().is_none());
}

#[test]
fn delete_missing_key_returns_false() {
    let store = SettingsStore::open_in_memory().unwrap();
    assert!(!store.delete("never-existed").unwrap());
}

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");

    {
        let store = SettingsStore::open(&path).unwrap();
        store.set("persisted", &json!({ "n": 42 })).unwrap();
    }

    let store = SettingsStore::open(&path).unwrap();
    assert_eq!(store.get("persisted").unwrap(), Some(json!({ "n": 42 })));
}

#[test]
fn non_object_values_are_supported() {
    let store = SettingsStore::open_in_memory().unwrap();
    store.set("string", &json!("plain")).unwrap();
    store.set("number", &json!(3.5)).unwrap();
    store.set("null", &json!(null)).unwrap();
    assert_eq!(store.get("string").unwrap(), Some(json!("plain")));
    assert_eq!(store.get("number").unwrap(), Some(json!(3.5)));
    assert_eq!(store.get("null").unwrap(), Some(json!(null)));
}
