//! Model indexes and relationship adjacency.

use crate::helpers::model_fixtures::{id, kerbal_model, model_from};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;
use syster_lpg::model::{Element, MetamodelHints, ModelOptions, StaticSource};
use syster_lpg::graph::LabeledPropertyGraph;
use syster_lpg::query::types_for_feature;
use syster_lpg::{Model, ModelError};

fn element(value: Value) -> Element {
    let Value::Object(record) = value else {
        panic!("expected object")
    };
    Element::from_record(record, &MetamodelHints::sysml()).unwrap()
}

#[test]
fn test_cartesian_adjacency_for_multi_endpoint_relationship() {
    let model = model_from(vec![
        json!({"@id": "s1", "@type": "PartUsage"}),
        json!({"@id": "s2", "@type": "PartUsage"}),
        json!({"@id": "t1", "@type": "PartDefinition"}),
        json!({"@id": "t2", "@type": "PartDefinition"}),
        json!({"@id": "t3", "@type": "PartDefinition"}),
        json!({
            "@id": "typing", "@type": "FeatureTyping",
            "source": [{"@id": "s1"}, {"@id": "s2"}],
            "target": [{"@id": "t1"}, {"@id": "t2"}, {"@id": "t3"}]
        }),
    ]);

    let through: usize = ["s1", "s2"]
        .iter()
        .map(|s| model.get(&id(s)).unwrap().derived().through("FeatureTyping").len())
        .sum();
    let reverse: usize = ["t1", "t2", "t3"]
        .iter()
        .map(|t| model.get(&id(t)).unwrap().derived().reverse("FeatureTyping").len())
        .sum();
    assert_eq!(through, 6);
    assert_eq!(reverse, 6);

    let s1 = model.get_element(&id("s1")).unwrap();
    let targets: Vec<_> = s1.through("FeatureTyping").iter().map(|e| e.id().to_string()).collect();
    assert_eq!(targets, vec!["t1", "t2", "t3"]);
    assert_eq!(
        model.get(&id("t2")).unwrap().derived().get("reverseFeatureTyping"),
        Some(&[id("s1"), id("s2")][..])
    );
}

#[rstest]
#[case("PartDefinition", 7)]
#[case("PartUsage", 3)]
#[case("Superclassing", 3)]
#[case("FeatureMembership", 3)]
#[case("Connector", 0)]
fn test_metatype_index(#[case] metatype: &str, #[case] expected: usize) {
    let model = kerbal_model();
    assert_eq!(model.ids_of_metatype(metatype).count(), expected);
}

#[test]
fn test_relationship_partition() {
    let model = kerbal_model();
    assert_eq!(model.relationship_count(), 9);
    assert_eq!(
        model.relationships().count() + model.non_relationships().count(),
        model.element_count()
    );
    assert!(model.relationships().all(|r| model.get(r).unwrap().is_relationship()));
}

#[test]
fn test_add_element_twice_changes_nothing() {
    let mut model = kerbal_model();
    let count = model.element_count();
    let relationships = model.relationship_count();
    let owned = model.owned_ids(&id("liquid_stage")).count();
    let through = model
        .get(&id("engines"))
        .unwrap()
        .derived()
        .through("FeatureTyping")
        .len();

    model.add_element(element(json!({
        "@id": "ft_engines", "@type": "FeatureTyping",
        "source": {"@id": "engines"}, "target": {"@id": "liquid_engine"}
    })));
    model.add_element(element(json!({
        "@id": "engines", "@type": "PartUsage", "name": "engines",
        "owningType": {"@id": "liquid_stage"}
    })));

    assert_eq!(model.element_count(), count);
    assert_eq!(model.relationship_count(), relationships);
    assert_eq!(model.owned_ids(&id("liquid_stage")).count(), owned);
    assert_eq!(model.ids_of_metatype("FeatureTyping").count(), 3);
    assert_eq!(
        model.get(&id("engines")).unwrap().derived().through("FeatureTyping").len(),
        through
    );
}

#[test]
fn test_ownership_navigation() {
    let model = kerbal_model();
    let engines = model.get_element(&id("engines")).unwrap();
    assert_eq!(engines.owner().unwrap().unwrap().name(), Some("LiquidStage"));

    let owned: Vec<_> = model
        .owned_elements(&id("liquid_stage"))
        .iter()
        .filter_map(|e| e.name())
        .collect();
    assert_eq!(owned, vec!["engines", "tank"]);

    assert!(model.get_owner(&id("kerbal")).unwrap().is_none());
    let roots: Vec<_> = model.roots().map(|e| e.id().to_string()).collect();
    assert!(roots.contains(&"kerbal".to_string()));
}

#[test]
fn test_reference_dereferencing_and_raw_fallback() {
    let model = kerbal_model();
    let stages = model.get_element(&id("stages")).unwrap();
    let range = stages.reference("multiplicity").unwrap();
    assert_eq!(range.metatype().map(|m| m.as_str()), Some("MultiplicityRange"));
    let upper = range.reference("upperBound").unwrap();
    assert_eq!(upper.raw("value").unwrap(), Some(&json!(5)));
}

#[test]
fn test_missing_element_is_not_found() {
    let model = kerbal_model();
    assert_eq!(
        model.get_element(&id("nowhere")).unwrap_err(),
        ModelError::NotFound(id("nowhere"))
    );
    assert!(model.find_element(&id("nowhere")).is_none());
}

#[test]
fn test_lazy_resolution_from_source() {
    let mut source = StaticSource::default();
    let Value::Object(record) = json!({"@id": "remote", "@type": "PartDefinition", "name": "Remote"})
    else {
        unreachable!()
    };
    source.insert(record);

    let mut model = Model::with_config(Arc::new(MetamodelHints::sysml()), ModelOptions::default());
    model.set_source(Arc::new(source));
    model.add_proxy("remote");

    assert_eq!(
        model.get_element(&id("remote")).unwrap_err(),
        ModelError::NotResolved(id("remote"))
    );
    assert_eq!(model.resolve(&id("remote")).unwrap().name(), Some("Remote"));
    assert!(model.resolve(&id("elsewhere")).unwrap_err().is_not_found());
}

#[test]
fn test_malformed_relationship_is_skipped() {
    let model = model_from(vec![
        json!({"@id": "a", "@type": "PartUsage"}),
        json!({"@id": "b", "@type": "PartDefinition"}),
        json!({"@id": "good", "@type": "FeatureTyping",
               "source": {"@id": "a"}, "target": {"@id": "b"}}),
        json!({"@id": "bad", "@type": "FeatureTyping",
               "source": {"@id": "a"}, "target": {"@id": "ghost"}}),
    ]);
    assert!(model.indexer().is_indexed(&id("good")));
    assert!(!model.indexer().is_indexed(&id("bad")));
    assert_eq!(model.indexer().skipped().collect::<Vec<_>>(), vec![&id("bad")]);
    assert_eq!(
        model.get(&id("a")).unwrap().derived().through("FeatureTyping"),
        &[id("b")]
    );
}

fn engine_library() -> Arc<Model> {
    Arc::new(model_from(vec![
        json!({"@id": "engine_def", "@type": "PartDefinition", "name": "Engine"}),
    ]))
}

fn typed_usage() -> Vec<Element> {
    vec![
        element(json!({"@id": "e", "@type": "PartUsage", "name": "e"})),
        element(json!({"@id": "ft", "@type": "FeatureTyping",
                       "source": {"@id": "e"}, "target": {"@id": "engine_def"}})),
    ]
}

#[test]
fn test_relationship_into_referenced_model_is_indexed() {
    let mut model = Model::with_config(Arc::new(MetamodelHints::sysml()), ModelOptions::default());
    model.add_referenced_model(engine_library());
    model.extend(typed_usage());

    assert!(model.indexer().is_indexed(&id("ft")));
    assert_eq!(model.indexer().skipped().count(), 0);
    assert_eq!(
        model.get(&id("e")).unwrap().derived().through("FeatureTyping"),
        &[id("engine_def")]
    );
    assert!(model.get(&id("engine_def")).unwrap().is_proxy());
    assert_eq!(model.get_element(&id("engine_def")).unwrap().name(), Some("Engine"));

    let lpg = LabeledPropertyGraph::new(&model);
    assert_eq!(lpg.metatype(&id("engine_def")), Some("PartDefinition"));
    assert_eq!(types_for_feature(&lpg, &id("e")).unwrap(), vec![id("engine_def")]);
}

#[test]
fn test_reindex_after_adding_referenced_model() {
    let mut model = Model::with_config(Arc::new(MetamodelHints::sysml()), ModelOptions::default());
    model.extend(typed_usage());
    assert_eq!(model.indexer().skipped().collect::<Vec<_>>(), vec![&id("ft")]);

    model.add_referenced_model(engine_library());
    assert_eq!(model.reindex_skipped(), 1);
    assert!(model.indexer().is_indexed(&id("ft")));
    assert_eq!(
        model.get(&id("engine_def")).unwrap().derived().reverse("FeatureTyping"),
        &[id("e")]
    );
}
