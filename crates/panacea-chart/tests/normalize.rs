//! Normalization tests across the three accepted outcome shapes.

use panacea_chart::{ChartError, normalize_payload, parse_outcome};
use panacea_model::OutcomePayload;
use serde_json::json;

fn payload(name: &str, groups: serde_json::Value) -> OutcomePayload {
    OutcomePayload {
        name: name.to_string(),
        chart_type: Some("bar".to_string()),
        description: None,
        units: Some("minutes".to_string()),
        groups,
    }
}

#[test]
fn grouped_object_form_normalizes() {
    // The reference scenario: two dosage groups, one category absent from
    // the first group.
    let payload = payload(
        "Sleep Latency",
        json!([
            { "label": "1 mg", "data": { "Elderly": 33.4, "Non-elderly": 0 } },
            { "label": "2 mg", "data": { "Elderly": 35.1, "Non-elderly": 35.1 } }
        ]),
    );

    let series = normalize_payload(&payload).expect("normalize grouped-object form");
    assert_eq!(series.group_labels, vec!["1 mg", "2 mg"]);
    assert_eq!(series.categories["Elderly"], vec![33.4, 35.1]);
    assert_eq!(series.categories["Non-elderly"], vec![0.0, 35.1]);
}

#[test]
fn pair_list_form_normalizes() {
    let payload = payload(
        "WASO",
        json!([
            { "label": "Week 4", "values": [
                { "group": "1 mg", "value": 30.8 },
                { "group": "2 mg", "value": 32.5 }
            ]},
            { "label": "Week 8", "values": [
                { "group": "2 mg", "value": 29.7 }
            ]}
        ]),
    );

    let series = normalize_payload(&payload).expect("normalize pair-list form");
    assert_eq!(series.group_labels, vec!["Week 4", "Week 8"]);
    // "1 mg" is missing from Week 8 and charts as zero there.
    assert_eq!(series.categories["1 mg"], vec![30.8, 0.0]);
    assert_eq!(series.categories["2 mg"], vec![32.5, 29.7]);
}

#[test]
fn baseline_delta_form_normalizes() {
    let payload = payload(
        "Sleep Latency",
        json!([
            { "group": "1 mg Elderly", "baseline": 45.0, "change": -11.6 },
            { "group": "2 mg Elderly", "baseline": 45.0, "change": -9.9 }
        ]),
    );

    let series = normalize_payload(&payload).expect("normalize baseline-delta form");
    assert_eq!(series.group_labels, vec!["1 mg Elderly", "2 mg Elderly"]);
    // A single series named after the metric, charted as baseline + change.
    assert_eq!(series.categories.len(), 1);
    let values = &series.categories["Sleep Latency"];
    assert!((values[0] - 33.4).abs() < 1e-9);
    assert!((values[1] - 35.1).abs() < 1e-9);
}

#[test]
fn alignment_invariant_holds_for_all_shapes() {
    let payloads = vec![
        payload(
            "A",
            json!([
                { "label": "1 mg", "data": { "Elderly": 1.0 } },
                { "label": "2 mg", "data": { "Non-elderly": 2.0 } },
                { "label": "3 mg", "data": { "Elderly": 3.0, "Non-elderly": 4.0 } }
            ]),
        ),
        payload(
            "B",
            json!([
                { "label": "Week 1", "values": [{ "group": "x", "value": 1.0 }] },
                { "label": "Week 2", "values": [{ "group": "y", "value": 2.0 }] }
            ]),
        ),
        payload(
            "C",
            json!([
                { "group": "1 mg", "baseline": 5.0, "change": 1.0 },
                { "group": "2 mg", "baseline": 5.0, "change": 2.0 }
            ]),
        ),
    ];

    for payload in &payloads {
        let series = normalize_payload(payload).expect("normalize");
        for (category, values) in &series.categories {
            assert_eq!(
                values.len(),
                series.group_labels.len(),
                "category '{category}' of '{}' is misaligned",
                payload.name
            );
        }
    }
}

#[test]
fn empty_outcome_is_no_data_not_an_error() {
    let empty_array = payload("Empty", json!([]));
    let series = normalize_payload(&empty_array).expect("empty array normalizes");
    assert!(series.is_empty());

    let null_groups = payload("Null", serde_json::Value::Null);
    let series = normalize_payload(&null_groups).expect("null groups normalize");
    assert!(series.is_empty());
}

#[test]
fn unrecognized_shape_is_reported_not_coerced() {
    let bad = payload(
        "Sleep Latency",
        json!([{ "dose": "1 mg", "elderly": 33.4 }]),
    );
    let error = parse_outcome(&bad).unwrap_err();
    match &error {
        ChartError::UnrecognizedOutcomeShape { metric, .. } => {
            assert_eq!(metric, "Sleep Latency");
        }
        other => panic!("expected UnrecognizedOutcomeShape, got {other:?}"),
    }

    let not_an_array = payload("Sleep Latency", json!({"label": "1 mg"}));
    assert!(parse_outcome(&not_an_array).is_err());
}

#[test]
fn group_order_and_category_first_seen_order_are_preserved() {
    let payload = payload(
        "Ordering",
        json!([
            { "label": "3 mg", "data": { "Non-elderly": 31.2 } },
            { "label": "1 mg", "data": { "Elderly": 33.4, "Non-elderly": 0 } }
        ]),
    );
    let series = normalize_payload(&payload).expect("normalize");
    assert_eq!(series.group_labels, vec!["3 mg", "1 mg"]);
    let categories: Vec<&str> = series.categories.keys().map(String::as_str).collect();
    assert_eq!(categories, vec!["Non-elderly", "Elderly"]);
}
