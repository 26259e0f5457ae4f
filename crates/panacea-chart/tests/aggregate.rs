//! Aggregation tests: ranking, truncation, rollup, and the conservation
//! property.

use panacea_chart::{ChartConfig, EventAggregator, EventSummary};
use panacea_model::AdverseEvent;
use proptest::prelude::*;

fn default_aggregator() -> EventAggregator {
    EventAggregator::new(&ChartConfig::default())
}

#[test]
fn eighteen_events_truncate_to_fifteen_plus_other() {
    // One dominant event at 40%, seventeen more at 2% and 1%.
    let mut events = vec![AdverseEvent::new("Dysgeusia", 40.0)];
    for i in 0..14 {
        events.push(AdverseEvent::new(format!("Event {i}"), 2.0));
    }
    for i in 14..17 {
        events.push(AdverseEvent::new(format!("Event {i}"), 1.0));
    }
    assert_eq!(events.len(), 18);

    let summary = default_aggregator().summarize(&events);
    match summary {
        EventSummary::Ranked { kept, other } => {
            assert_eq!(kept.len(), 15);
            assert_eq!(kept[0].event, "Dysgeusia");
            assert_eq!(kept[0].percentage, 40.0);
            // Other = the three truncated 1% events.
            let other = other.expect("remainder is positive");
            assert!((other - 3.0).abs() < 1e-9);
        }
        EventSummary::NoData => panic!("expected ranked events"),
    }
}

#[test]
fn ranking_is_descending_and_deterministic() {
    let events = vec![
        AdverseEvent::new("Headache", 10.0),
        AdverseEvent::new("Dysgeusia", 36.0),
        AdverseEvent::new("Somnolence", 7.0),
        AdverseEvent::new("Nasopharyngitis", 22.0),
    ];

    let first = default_aggregator().summarize(&events);
    let second = default_aggregator().summarize(&events);
    assert_eq!(first, second);

    match first {
        EventSummary::Ranked { kept, .. } => {
            let names: Vec<&str> = kept.iter().map(|e| e.event.as_str()).collect();
            assert_eq!(
                names,
                vec!["Dysgeusia", "Nasopharyngitis", "Headache", "Somnolence"]
            );
        }
        EventSummary::NoData => panic!("expected ranked events"),
    }
}

#[test]
fn empty_input_yields_no_data() {
    assert!(default_aggregator().summarize(&[]).is_no_data());
}

proptest! {
    /// sum(kept) + other == sum(input) within floating-point tolerance,
    /// and never more than top_n kept entries.
    #[test]
    fn rollup_conserves_total_percentage(
        percentages in proptest::collection::vec(0.0f64..100.0, 0..40)
    ) {
        let events: Vec<AdverseEvent> = percentages
            .iter()
            .enumerate()
            .map(|(i, pct)| AdverseEvent::new(format!("Event {i}"), *pct))
            .collect();
        let input_total: f64 = percentages.iter().sum();

        match default_aggregator().summarize(&events) {
            EventSummary::NoData => prop_assert!(events.is_empty()),
            summary @ EventSummary::Ranked { .. } => {
                prop_assert!((summary.total() - input_total).abs() < 1e-6);
                if let EventSummary::Ranked { kept, .. } = &summary {
                    prop_assert!(kept.len() <= 15);
                }
            }
        }
    }
}
