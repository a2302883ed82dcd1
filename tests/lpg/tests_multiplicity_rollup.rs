//! Multiplicity rollup over features and types.

use crate::helpers::model_fixtures::{id, kerbal_model, model_from, simple_parts_model};
use rstest::rstest;
use serde_json::json;
use syster_lpg::graph::LabeledPropertyGraph;
use syster_lpg::query::{
    Bound, BoundKind, Multiplicity, Resolution, feature_multiplicity, roll_up_lower_multiplicity,
    roll_up_multiplicity, roll_up_multiplicity_for_type, roll_up_upper_multiplicity,
};

#[rstest]
#[case("engines", 0, 40)]
#[case("stages", 1, 5)]
#[case("tank", 1, 10)]
fn test_feature_rollup(#[case] feature: &str, #[case] lower: u64, #[case] upper: u64) {
    let model = kerbal_model();
    let lpg = LabeledPropertyGraph::new(&model);
    assert_eq!(
        roll_up_lower_multiplicity(&lpg, &id(feature)).unwrap(),
        Resolution::Unique(Bound::Finite(lower))
    );
    assert_eq!(
        roll_up_upper_multiplicity(&lpg, &id(feature)).unwrap(),
        Resolution::Unique(Bound::Finite(upper))
    );
}

#[rstest]
#[case("liquid_engine", 40)]
#[case("ft200", 10)]
#[case("stage", 5)]
#[case("rocket", 0)]
#[case("engine", 0)]
fn test_type_rollup(#[case] ty: &str, #[case] upper: u64) {
    let model = kerbal_model();
    let lpg = LabeledPropertyGraph::new(&model);
    assert_eq!(
        roll_up_multiplicity_for_type(&lpg, &id(ty), BoundKind::Upper).unwrap(),
        Resolution::Unique(Bound::Finite(upper))
    );
}

#[test]
fn test_port_type_rollup_sums_features() {
    let model = simple_parts_model();
    let lpg = LabeledPropertyGraph::new(&model);
    assert_eq!(
        roll_up_upper_multiplicity(&lpg, &id("power_in")).unwrap(),
        Resolution::Unique(Bound::Finite(4))
    );
    assert_eq!(
        roll_up_upper_multiplicity(&lpg, &id("power_out")).unwrap(),
        Resolution::Unique(Bound::Finite(2))
    );
    assert_eq!(
        roll_up_multiplicity_for_type(&lpg, &id("power_port"), BoundKind::Upper).unwrap(),
        Resolution::Unique(Bound::Finite(6))
    );
}

#[test]
fn test_feature_without_multiplicity_is_one() {
    let model = model_from(vec![json!({"@id": "solo", "@type": "PartUsage", "name": "solo"})]);
    assert_eq!(
        feature_multiplicity(&model, &id("solo")).unwrap(),
        Multiplicity::ONE
    );
    let lpg = LabeledPropertyGraph::new(&model);
    assert_eq!(
        roll_up_multiplicity(&lpg, &id("solo")).unwrap(),
        Resolution::Unique(Multiplicity::ONE)
    );
}

#[test]
fn test_unbounded_upper_saturates() {
    let model = model_from(vec![
        json!({"@id": "fleet", "@type": "PartDefinition", "name": "Fleet"}),
        json!({"@id": "ship", "@type": "PartDefinition", "name": "Ship"}),
        json!({"@id": "ships", "@type": "PartUsage", "name": "ships", "multiplicity": {"@id": "m"}}),
        json!({"@id": "m", "@type": "MultiplicityRange",
               "lowerBound": {"@id": "zero"}, "upperBound": {"@id": "star"}}),
        json!({"@id": "zero", "@type": "LiteralInteger", "value": 0}),
        json!({"@id": "star", "@type": "LiteralInfinity"}),
        json!({"@id": "fm", "@type": "FeatureMembership",
               "source": {"@id": "fleet"}, "target": {"@id": "ships"}}),
        json!({"@id": "ft", "@type": "FeatureTyping",
               "source": {"@id": "ships"}, "target": {"@id": "ship"}}),
    ]);
    let lpg = LabeledPropertyGraph::new(&model);
    assert_eq!(
        roll_up_multiplicity(&lpg, &id("ships")).unwrap(),
        Resolution::Unique(Multiplicity {
            lower: Bound::ZERO,
            upper: Bound::Unbounded,
        })
    );
    assert_eq!(
        roll_up_multiplicity_for_type(&lpg, &id("ship"), BoundKind::Upper)
            .unwrap()
            .to_string(),
        "*"
    );
}

#[test]
fn test_multiple_types_make_rollup_ambiguous() {
    let model = model_from(vec![
        json!({"@id": "a", "@type": "PartDefinition", "name": "A"}),
        json!({"@id": "b", "@type": "PartDefinition", "name": "B"}),
        json!({"@id": "both", "@type": "PartUsage", "name": "both"}),
        json!({"@id": "t1", "@type": "FeatureTyping",
               "source": {"@id": "both"}, "target": {"@id": "a"}}),
        json!({"@id": "t2", "@type": "FeatureTyping",
               "source": {"@id": "both"}, "target": {"@id": "b"}}),
    ]);
    let lpg = LabeledPropertyGraph::new(&model);
    let rolled = roll_up_upper_multiplicity(&lpg, &id("both")).unwrap();
    assert_eq!(rolled, Resolution::Ambiguous(vec![id("a"), id("b")]));
    assert_eq!(rolled.to_string(), "Multiple Names");
    assert!(
        roll_up_multiplicity_for_type(&lpg, &id("a"), BoundKind::Upper)
            .unwrap()
            .is_ambiguous()
    );
}

#[test]
fn test_rollup_of_unknown_feature_fails() {
    let model = kerbal_model();
    let lpg = LabeledPropertyGraph::new(&model);
    assert!(roll_up_multiplicity(&lpg, &id("missing")).is_err());
}
