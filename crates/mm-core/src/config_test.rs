use super::*;
use std::io::Write;

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"{
        "source": {
            "username": "ops@example.com",
            "password": "secret",
            "base_url": "https://staging.example.com/",
            "database_id": 1
        },
        "destination": {
            "username": "ops@example.com",
            "password": "secret",
            "base_url": "https://prod.example.com",
            "database_id": 4
        },
        "source_collection_id": 12
    }"#,
    );
    let config = RunConfig::load(file.path()).unwrap();
    assert_eq!(config.source.database_id, 1);
    assert_eq!(config.destination.database_id, 4);
    // trailing slash is stripped
    assert_eq!(config.source.base_url, "https://staging.example.com");
    assert_eq!(config.source_collection_id, CollectionRef::Id(12));
}

#[test]
fn test_root_collection_sentinel() {
    let json = r#""root""#;
    let parsed: CollectionRef = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, CollectionRef::Root);
    assert_eq!(parsed.to_string(), "root");
    assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
}

#[test]
fn test_numeric_collection_ref_roundtrip() {
    let parsed: CollectionRef = serde_json::from_str("42").unwrap();
    assert_eq!(parsed, CollectionRef::Id(42));
    assert_eq!(serde_json::to_string(&parsed).unwrap(), "42");
}

#[test]
fn test_invalid_collection_ref() {
    assert!(serde_json::from_str::<CollectionRef>(r#""junk""#).is_err());
    assert!(serde_json::from_str::<CollectionRef>("-3").is_err());
}

#[test]
fn test_missing_file() {
    let err = RunConfig::load(std::path::Path::new("/nonexistent/mm.json")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_malformed_json() {
    let file = write_config("{ not json");
    let err = RunConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParse { .. }));
}

#[test]
fn test_empty_credential_field_rejected() {
    let file = write_config(
        r#"{
        "source": {"username": "", "password": "x", "base_url": "http://a", "database_id": 1},
        "destination": {"username": "u", "password": "x", "base_url": "http://b", "database_id": 4},
        "source_collection_id": "root"
    }"#,
    );
    let err = RunConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}
