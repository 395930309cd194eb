//! Catalog tests

use super::*;
use crate::config::TapConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

fn discovered() -> Catalog {
    let config = TapConfig::from_value(json!({
        "client_id": "id",
        "client_secret": "secret",
        "start_date": "2020-01-01T00:00:00Z"
    }))
    .unwrap();
    let registry = SchemaRegistry::builtin().unwrap();
    Catalog::discover(&registry, &StreamDescriptor::all(&config)).unwrap()
}

#[test]
fn test_discover_selects_every_stream() {
    let catalog = discovered();
    let ids: Vec<_> = catalog.selected_streams().map(|s| s.tap_stream_id.as_str()).collect();
    assert_eq!(ids, vec!["users", "groups"]);

    let users = catalog.get("users").unwrap();
    assert_eq!(users.key_properties, vec!["id".to_string()]);
    assert_eq!(users.replication_key.as_deref(), Some("updated_at"));
    assert_eq!(users.schema["properties"]["department"]["type"], json!(["string", "null"]));

    let metadata = &users.metadata[0];
    assert!(metadata.is_stream_level());
    assert_eq!(metadata.metadata["valid-replication-keys"], json!(["updated_at"]));
    assert_eq!(metadata.metadata["forced-replication-method"], json!("INCREMENTAL"));
}

#[test]
fn test_discover_unknown_schema_fails() {
    let registry = SchemaRegistry::default();
    let err = Catalog::discover(&registry, &[StreamDescriptor::groups()]).unwrap_err();
    assert!(matches!(err, Error::StreamNotFound { .. }));
}

#[test]
fn test_catalog_json_round_trip_keeps_selection() {
    let mut catalog = discovered();
    catalog.streams[0].set_selected(false);

    let text = catalog.to_json().unwrap();
    let parsed = Catalog::from_json(&text).unwrap();
    assert_eq!(parsed, catalog);

    let ids: Vec<_> = parsed.selected_streams().map(|s| s.stream.as_str()).collect();
    assert_eq!(ids, vec!["groups"]);
}

#[test]
fn test_field_level_selection_is_ignored() {
    let catalog = Catalog::from_json(
        &json!({
            "streams": [{
                "tap_stream_id": "users",
                "stream": "users",
                "schema": {},
                "metadata": [
                    {"breadcrumb": ["properties", "email"], "metadata": {"selected": true}}
                ]
            }]
        })
        .to_string(),
    )
    .unwrap();
    assert_eq!(catalog.selected_streams().count(), 0);
}

#[test]
fn test_set_selected_adds_missing_metadata() {
    let mut entry = CatalogEntry {
        tap_stream_id: "groups".to_string(),
        stream: "groups".to_string(),
        schema: json!({}),
        key_properties: vec![],
        replication_key: None,
        replication_method: None,
        metadata: vec![],
    };
    assert!(!entry.is_selected());
    entry.set_selected(true);
    assert!(entry.is_selected());
    assert_eq!(entry.metadata.len(), 1);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(discovered().to_json().unwrap().as_bytes())
        .unwrap();

    let catalog = Catalog::from_file(file.path()).unwrap();
    assert_eq!(catalog.streams.len(), 2);
}

#[test]
fn test_from_file_missing_or_invalid() {
    assert!(matches!(
        Catalog::from_file("/nonexistent/catalog.json"),
        Err(Error::FileNotFound { .. })
    ));
    assert!(Catalog::from_json("{\"streams\": 3}").unwrap_err().is_config_error());
}
