//! Small SysML v2 exchange fixtures as flat JSON records.

use serde_json::{Value, json};
use std::sync::Arc;
use syster_lpg::interchange::load_from_records;
use syster_lpg::model::{MetamodelHints, ModelOptions, Record};
use syster_lpg::{ElementId, Model};

/// Shorthand for building an id.
pub fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(record) => record,
            other => panic!("fixture record is not an object: {other}"),
        })
        .collect()
}

/// Build a model from fixture records with default configuration.
pub fn model_from(values: Vec<Value>) -> Model {
    load_from_records(
        records(values),
        Arc::new(MetamodelHints::sysml()),
        ModelOptions::default(),
    )
    .expect("fixture should load")
}

fn literal(id: &str, value: u64) -> Value {
    json!({"@id": id, "@type": "LiteralInteger", "value": value})
}

fn range(id: &str, lower: &str, upper: &str) -> Value {
    json!({
        "@id": id, "@type": "MultiplicityRange",
        "lowerBound": {"@id": lower}, "upperBound": {"@id": upper}
    })
}

fn relationship(id: &str, metatype: &str, source: &str, target: &str) -> Value {
    json!({
        "@id": id, "@type": metatype,
        "source": [{"@id": source}], "target": [{"@id": target}]
    })
}

fn part_def(id: &str, name: &str) -> Value {
    json!({
        "@id": id, "@type": "PartDefinition", "name": name,
        "qualifiedName": format!("Kerbal::{name}"),
        "owningNamespace": {"@id": "kerbal"}
    })
}

fn part_usage(id: &str, name: &str, owner: &str, multiplicity: &str) -> Value {
    json!({
        "@id": id, "@type": "PartUsage", "name": name,
        "owningType": {"@id": owner},
        "featuringType": [{"@id": owner}],
        "multiplicity": {"@id": multiplicity}
    })
}

// ============================================================================
// KERBAL
// ============================================================================

/// A rocket built from stages that carry engines and tanks.
///
/// ```text
/// Rocket ── stages: Stage[1..5]
/// LiquidStage :> Stage
///   ├── engines: LiquidEngine[0..8]
///   └── tank: FT200[1..2]
/// LiquidEngine :> Engine
/// FT200 :> FuelTank
/// ```
pub fn kerbal_values() -> Vec<Value> {
    vec![
        json!({"@id": "kerbal", "@type": "Package", "name": "Kerbal", "qualifiedName": "Kerbal"}),
        part_def("rocket", "Rocket"),
        part_def("stage", "Stage"),
        part_def("liquid_stage", "LiquidStage"),
        part_def("engine", "Engine"),
        part_def("liquid_engine", "LiquidEngine"),
        part_def("fuel_tank", "FuelTank"),
        part_def("ft200", "FT200"),
        part_usage("stages", "stages", "rocket", "stages_mult"),
        part_usage("engines", "engines", "liquid_stage", "engines_mult"),
        part_usage("tank", "tank", "liquid_stage", "tank_mult"),
        range("stages_mult", "one", "five"),
        range("engines_mult", "zero", "eight"),
        range("tank_mult", "one", "two"),
        literal("zero", 0),
        literal("one", 1),
        literal("two", 2),
        literal("five", 5),
        literal("eight", 8),
        relationship("sc_liquid_stage", "Superclassing", "liquid_stage", "stage"),
        relationship("sc_liquid_engine", "Superclassing", "liquid_engine", "engine"),
        relationship("sc_ft200", "Superclassing", "ft200", "fuel_tank"),
        relationship("ft_stages", "FeatureTyping", "stages", "stage"),
        relationship("ft_engines", "FeatureTyping", "engines", "liquid_engine"),
        relationship("ft_tank", "FeatureTyping", "tank", "ft200"),
        relationship("fm_stages", "FeatureMembership", "rocket", "stages"),
        relationship("fm_engines", "FeatureMembership", "liquid_stage", "engines"),
        relationship("fm_tank", "FeatureMembership", "liquid_stage", "tank"),
    ]
}

pub fn kerbal_model() -> Model {
    model_from(kerbal_values())
}

// ============================================================================
// SIMPLE PARTS
// ============================================================================

/// A power group exposing two port usages of the same port type.
pub fn simple_parts_model() -> Model {
    model_from(vec![
        json!({"@id": "power_port", "@type": "PortDefinition", "name": "PowerPort"}),
        json!({"@id": "power_group", "@type": "PartDefinition", "name": "PowerGroup"}),
        json!({
            "@id": "power_in", "@type": "PortUsage", "name": "powerIn",
            "owningType": {"@id": "power_group"}, "multiplicity": {"@id": "in_mult"}
        }),
        json!({
            "@id": "power_out", "@type": "PortUsage", "name": "powerOut",
            "owningType": {"@id": "power_group"}, "multiplicity": {"@id": "out_mult"}
        }),
        json!({"@id": "in_mult", "@type": "MultiplicityRange", "upperBound": {"@id": "four"}}),
        json!({"@id": "out_mult", "@type": "MultiplicityRange", "upperBound": {"@id": "two"}}),
        literal("four", 4),
        literal("two", 2),
        relationship("ft_in", "FeatureTyping", "power_in", "power_port"),
        relationship("ft_out", "FeatureTyping", "power_out", "power_port"),
        relationship("fm_in", "FeatureMembership", "power_group", "power_in"),
        relationship("fm_out", "FeatureMembership", "power_group", "power_out"),
    ])
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

fn attribute(id: &str, context: &str) -> Value {
    json!({
        "@id": id, "@type": "AttributeUsage", "name": id,
        "featuringType": [{"@id": context}]
    })
}

/// `c` redefines `b` redefines `a`, all featured by `Calc`.
pub fn redefinition_chain_model() -> Model {
    model_from(vec![
        json!({"@id": "calc", "@type": "PartDefinition", "name": "Calc"}),
        attribute("a", "calc"),
        attribute("b", "calc"),
        attribute("c", "calc"),
        relationship("r_ba", "Redefinition", "b", "a"),
        relationship("r_cb", "Redefinition", "c", "b"),
    ])
}

/// `total = mass`, written as a feature value holding a reference
/// expression.
pub fn feature_value_model() -> Model {
    model_from(vec![
        json!({"@id": "craft", "@type": "PartDefinition", "name": "Craft"}),
        attribute("total", "craft"),
        attribute("mass", "craft"),
        json!({
            "@id": "fre", "@type": "FeatureReferenceExpression",
            "result": {"@id": "fre_result"}, "referent": {"@id": "mass"}
        }),
        json!({"@id": "fre_result", "@type": "Feature", "owningType": {"@id": "fre"}}),
        relationship("fv_total", "FeatureValue", "total", "fre"),
    ])
}

/// A root feeding into a two-attribute redefinition cycle.
pub fn cyclic_redefinition_model() -> Model {
    model_from(vec![
        json!({"@id": "loop", "@type": "PartDefinition", "name": "Loop"}),
        attribute("r", "loop"),
        attribute("x", "loop"),
        attribute("y", "loop"),
        relationship("s_xr", "Redefinition", "x", "r"),
        relationship("s_yx", "Redefinition", "y", "x"),
        relationship("s_xy", "Redefinition", "x", "y"),
    ])
}
