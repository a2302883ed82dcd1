//! Evaluation order over the expression inferred projection.

use crate::helpers::model_fixtures::{
    cyclic_redefinition_model, feature_value_model, id, kerbal_model, redefinition_chain_model,
};
use syster_lpg::graph::{EdgeLabel, LabeledPropertyGraph, names};
use syster_lpg::interpret::{ExecutionKind, FeatureTypeWorkingMap, generate_execution_order};

fn steps(order: &syster_lpg::ExecutionOrder) -> Vec<(String, String, ExecutionKind)> {
    order
        .pairs()
        .map(|(producer, consumer, kind)| (producer.to_string(), consumer.to_string(), kind))
        .collect()
}

fn step(producer: &str, consumer: &str, kind: ExecutionKind) -> (String, String, ExecutionKind) {
    (producer.to_string(), consumer.to_string(), kind)
}

#[test]
fn test_redefinition_chain_runs_earliest_first() {
    let model = redefinition_chain_model();
    let lpg = LabeledPropertyGraph::new(&model);
    let eig = lpg.get_projection(names::EXPRESSION_INFERRED).unwrap();
    assert_eq!(eig.roots(), vec![&id("a")]);

    let order = generate_execution_order(&lpg).unwrap();
    assert_eq!(
        steps(&order),
        vec![
            step("c", "b", ExecutionKind::Redefinition),
            step("b", "a", ExecutionKind::Redefinition),
        ]
    );
    assert_eq!(order.contexts.len(), 1);
    assert_eq!(order.contexts[&id("calc")], vec![id("c"), id("b")]);
}

#[test]
fn test_feature_value_flows_through_implied_edges() {
    let model = feature_value_model();
    let lpg = LabeledPropertyGraph::new(&model);
    assert!(lpg.has_edge(
        &id("fre_result"),
        &id("mass"),
        &EdgeLabel::forward("ImpliedReferentFeed")
    ));
    assert!(lpg.has_edge(
        &id("total"),
        &id("fre_result"),
        &EdgeLabel::forward("ImpliedResultFeed")
    ));

    let order = generate_execution_order(&lpg).unwrap();
    assert_eq!(
        steps(&order),
        vec![
            step("mass", "fre_result", ExecutionKind::Unclassified),
            step("fre_result", "total", ExecutionKind::ValueBinding),
            step("fre", "total", ExecutionKind::Unclassified),
        ]
    );
    assert_eq!(
        order.contexts[&id("craft")],
        vec![id("mass"), id("fre_result"), id("fre")]
    );
}

#[test]
fn test_cycle_terminates_with_each_edge_once() {
    let model = cyclic_redefinition_model();
    let lpg = LabeledPropertyGraph::new(&model);
    let order = generate_execution_order(&lpg).unwrap();
    assert_eq!(
        steps(&order),
        vec![
            step("x", "y", ExecutionKind::Redefinition),
            step("y", "x", ExecutionKind::Redefinition),
            step("x", "r", ExecutionKind::Redefinition),
        ]
    );
}

#[test]
fn test_model_without_expressions_has_no_steps() {
    let model = kerbal_model();
    let lpg = LabeledPropertyGraph::new(&model);
    let order = generate_execution_order(&lpg).unwrap();
    assert!(order.is_empty());
    assert_eq!(order.len(), 0);
}

#[test]
fn test_order_serializes_steps() {
    let model = redefinition_chain_model();
    let lpg = LabeledPropertyGraph::new(&model);
    let order = generate_execution_order(&lpg).unwrap();
    let value = serde_json::to_value(&order).unwrap();
    assert_eq!(value["steps"][0]["kind"], "Redefinition");
    assert_eq!(value["steps"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_working_map_follows_execution_context() {
    let model = redefinition_chain_model();
    let lpg = LabeledPropertyGraph::new(&model);
    let order = generate_execution_order(&lpg).unwrap();

    let mut map = FeatureTypeWorkingMap::new(&model);
    for context in order.contexts.keys() {
        map.add_type_instance(context);
    }
    for step in &order.steps {
        map.add_atom_value(&id("calc"), &[step.consumer.clone()], step.producer.clone())
            .unwrap();
    }
    assert_eq!(map.atom_values(&id("calc"), &[id("b")]), &[id("c")]);
    assert_eq!(map.atom_values(&id("calc"), &[id("a")]), &[id("b")]);
    let bindings = map.bindings().unwrap();
    assert_eq!(bindings.len(), 2);
    assert!(map.to_string().contains("Calc"));
}
