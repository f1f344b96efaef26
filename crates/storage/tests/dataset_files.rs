use std::fs;

use storage::{RecordStore, StorageError};

#[test]
fn loads_legacy_json_dataset_with_short_field_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("students.json");
    let raw = serde_json::json!({
        "students": [{
            "regNo": "STU/2024/001",
            "pin": "123456",
            "name": "Ibrahim Musa",
            "class": "SSS 3",
            "term": "Second Term",
            "session": "2023/2024",
            "position": "1st",
            "average": 88.5,
            "remarks": "An excellent performance. Keep it up!",
            "subjects": [
                { "name": "Mathematics", "ca": 38, "exam": 55, "total": 93, "grade": "A" }
            ]
        }]
    });
    fs::write(&path, raw.to_string()).expect("write dataset");

    let store = RecordStore::load_from_path(&path).expect("load");
    let record = store
        .find_by_credentials("STU/2024/001", "123456")
        .expect("record");
    assert_eq!(record.class_name, "SSS 3");
    assert_eq!(record.subjects[0].total, 93.0);
}

#[test]
fn exported_toml_dataset_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("students.toml");
    let raw = toml::to_string(&RecordStore::sample().to_dataset()).expect("toml");
    fs::write(&path, raw).expect("write dataset");

    let store = RecordStore::load_from_path(&path).expect("load");
    assert_eq!(store.len(), 2);
    assert!(store.find_by_credentials("STU/2024/002", "654321").is_some());
}

#[test]
fn duplicate_registration_fails_loading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("students.json");
    let mut dataset = RecordStore::sample().to_dataset();
    let mut copy = dataset.students[0].clone();
    copy.pin = "999999".into();
    dataset.students.push(copy);
    fs::write(&path, serde_json::to_string(&dataset).expect("json")).expect("write");

    let err = RecordStore::load_from_path(&path).expect_err("duplicate");
    assert!(matches!(
        err.downcast_ref::<StorageError>(),
        Some(StorageError::DuplicateRegistration { .. })
    ));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("students.csv");
    fs::write(&path, "regNo,pin").expect("write");

    let err = RecordStore::load_from_path(&path).expect_err("csv unsupported");
    assert!(err.to_string().contains("unsupported dataset format"));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = RecordStore::load_from_path(&path).expect_err("missing");
    assert!(err.to_string().contains("absent.json"));
}
