//! Loading and saving models on disk.

use crate::helpers::model_fixtures::{id, kerbal_model};
use std::sync::Arc;
use syster_lpg::interchange::{
    InterchangeError, load_from_file, load_from_post_envelope, load_from_post_files, save_to_file,
    supported_extensions,
};
use syster_lpg::model::{MetamodelHints, ModelOptions, Record};
use syster_lpg::{LabeledPropertyGraph, Model};
use tempfile::TempDir;

fn hints() -> Arc<MetamodelHints> {
    Arc::new(MetamodelHints::sysml())
}

fn records(model: &Model) -> Vec<Record> {
    let mut records: Vec<_> = model.iter_elements().filter_map(|e| e.to_record()).collect();
    records.sort_by(|a, b| a["@id"].as_str().cmp(&b["@id"].as_str()));
    records
}

#[test]
fn test_save_and_reload_preserves_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kerbal.json");
    let model = kerbal_model();

    save_to_file(&model, &path).unwrap();
    let reloaded = load_from_file(&path, hints(), ModelOptions::default()).unwrap();

    assert_eq!(reloaded.element_count(), model.element_count());
    assert_eq!(reloaded.relationship_count(), model.relationship_count());
    assert_eq!(records(&reloaded), records(&model));
    assert!(reloaded.origin().is_some_and(|o| o.ends_with("kerbal.json")));

    let lpg = LabeledPropertyGraph::new(&reloaded);
    assert_eq!(lpg.edge_count(), model.relationship_count());
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kerbal.json");
    std::fs::write(&path, b"stale").unwrap();

    save_to_file(&kerbal_model(), &path).unwrap();
    let reloaded = load_from_file(&path, hints(), ModelOptions::default()).unwrap();
    assert!(reloaded.get(&id("rocket")).is_some());
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_from_file(dir.path().join("absent.json"), hints(), ModelOptions::default())
        .unwrap_err();
    assert!(matches!(err, InterchangeError::Io(_)));
}

#[test]
fn test_post_envelope_takes_identity() {
    let input = br#"[
        {"identity": {"@id": "rocket"}, "payload": {"@type": "PartDefinition", "name": "Rocket"}},
        {"identity": {"@id": "stages"}, "payload": {"@type": "PartUsage", "name": "stages",
            "owningType": {"@id": "rocket"}}}
    ]"#;
    let model = load_from_post_envelope(input, hints(), ModelOptions::default()).unwrap();
    assert_eq!(model.element_count(), 2);
    assert_eq!(model.name_of(&id("rocket")), Some("Rocket"));
    let stages = model.get_element(&id("stages")).unwrap();
    assert_eq!(stages.owner().unwrap().unwrap().id(), &id("rocket"));
}

#[test]
fn test_post_files_are_concatenated() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("defs.json");
    let second = dir.path().join("typing.json");
    std::fs::write(
        &first,
        br#"[
            {"identity": {"@id": "stage"}, "payload": {"@type": "PartDefinition", "name": "Stage"}},
            {"identity": {"@id": "stages"}, "payload": {"@type": "PartUsage", "name": "stages"}}
        ]"#,
    )
    .unwrap();
    std::fs::write(
        &second,
        br#"{"@type": "Commit", "change": [
            {"identity": {"@id": "ft"}, "payload": {"@type": "FeatureTyping",
                "source": [{"@id": "stages"}], "target": [{"@id": "stage"}]}}
        ]}"#,
    )
    .unwrap();

    let model = load_from_post_files(&[&first, &second], hints(), ModelOptions::default()).unwrap();
    assert_eq!(model.element_count(), 3);
    assert_eq!(model.relationship_count(), 1);
    assert!(model.origin().is_some_and(|o| o.contains("defs.json") && o.contains("typing.json")));
    assert_eq!(
        model.get(&id("stages")).unwrap().derived().through("FeatureTyping"),
        &[id("stage")]
    );
}

#[test]
fn test_supported_extensions() {
    assert!(supported_extensions().contains(&"json"));
}
