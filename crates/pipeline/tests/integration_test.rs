//! Integration tests for the prediction stage.
//!
//! These tests run real sessions through the transition table, the
//! ranker and the predictor together.

use data_loader::{SessionData, TestSession, TrainSession};
use pipeline::{PredictionBranch, Predictor};
use recall::{RecallConfig, RecallIndex, TransitionTable};
use std::collections::HashSet;
use std::sync::Arc;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn create_test_setup() -> SessionData {
    let mut data = SessionData::new();

    // X is followed by A twice, then B and C once each
    for next in ["A", "A", "B", "C"] {
        data.insert_train(TrainSession {
            items: strings(&["X"]),
            next_item: next.to_string(),
            locale: "DE".to_string(),
        });
    }

    // Popular items G0..G249 follow a long browsing session
    let popular: Vec<String> = (0..250).map(|i| format!("G{i:03}")).collect();
    for window in popular.chunks(50) {
        data.insert_train(TrainSession {
            items: window.to_vec(),
            next_item: "A".to_string(),
            locale: "JP".to_string(),
        });
    }

    // Test sessions: known last item, unknown last item, single item
    data.insert_test(TestSession {
        items: strings(&["C", "X"]),
        locale: "DE".to_string(),
    });
    data.insert_test(TestSession {
        items: strings(&["NEVER_SEEN"]),
        locale: "UK".to_string(),
    });
    data.insert_test(TestSession {
        items: strings(&["X"]),
        locale: "DE".to_string(),
    });

    data
}

fn build_predictor(data: &SessionData, config: &RecallConfig) -> Predictor {
    let table = TransitionTable::from_sessions(data);
    let index = RecallIndex::build(&table, config);
    Predictor::new(Arc::new(index), config)
}

#[test]
fn test_predictions_for_every_test_session() {
    let data = create_test_setup();
    let predictor = build_predictor(&data, &RecallConfig::default());

    let predictions = predictor.predict_all(data.test_sessions()).unwrap();

    assert_eq!(predictions.len(), 3);
    for prediction in &predictions {
        assert_eq!(prediction.items.len(), 100);
        let distinct: HashSet<&String> = prediction.items.iter().collect();
        assert_eq!(distinct.len(), 100, "predictions must not repeat items");
    }
}

#[test]
fn test_known_item_is_ranked_then_backfilled() {
    let data = create_test_setup();
    let predictor = build_predictor(&data, &RecallConfig::default());

    let predictions = predictor.predict_all(data.test_sessions()).unwrap();
    let first = &predictions[0];

    // The test session C -> X adds X as successor of C, not of X
    assert_eq!(first.branch, PredictionBranch::Backfilled);
    assert_eq!(first.items[..3], strings(&["A", "B", "C"])[..]);
    assert!(!first.items[3..].contains(&"X".to_string()));
    assert_eq!(first.locale, "DE");
}

#[test]
fn test_unknown_item_gets_fallback_head() {
    let data = create_test_setup();
    let config = RecallConfig::default();
    let table = TransitionTable::from_sessions(&data);
    let index = RecallIndex::build(&table, &config);
    let fallback_head = index.fallback()[..100].to_vec();
    let predictor = Predictor::new(Arc::new(index), &config);

    let prediction = predictor.predict(&data.test_sessions()[1]).unwrap();

    assert_eq!(prediction.branch, PredictionBranch::FallbackOnly);
    assert_eq!(prediction.items, fallback_head);
    assert_eq!(prediction.locale, "UK");
}

#[test]
fn test_smaller_configuration() {
    let data = create_test_setup();
    let config = RecallConfig::new()
        .with_per_item_top_k(2)
        .with_fallback_top_k(5)
        .with_prediction_size(2);
    let predictor = build_predictor(&data, &config);

    let prediction = predictor.predict(&data.test_sessions()[2]).unwrap();
    assert_eq!(prediction.branch, PredictionBranch::Truncated);
    assert_eq!(prediction.items, strings(&["A", "B"]));
}

#[test]
fn test_prediction_is_deterministic() {
    let data = create_test_setup();
    let first = build_predictor(&data, &RecallConfig::default())
        .predict_all(data.test_sessions())
        .unwrap();
    let second = build_predictor(&data, &RecallConfig::default())
        .predict_all(data.test_sessions())
        .unwrap();
    assert_eq!(first, second);
}
