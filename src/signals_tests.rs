// File: signals_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::config::{BiasPolarity, BiasRule, SignalRules, TrendRepresentation};
    use crate::signals::*;
    use crate::storage::NodeSnapshotRecord;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use rstest::*;
    use serde_json::{json, Map, Value};

    fn t() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn snapshot(timestamp: NaiveDateTime, total: u64, tor: f64) -> NodeSnapshotRecord {
        NodeSnapshotRecord {
            timestamp,
            total_nodes: total,
            active_nodes: total,
            tor_percentage: tor,
            node_analysis: None,
        }
    }

    fn node_map(count: usize, tor_every: usize) -> Map<String, Value> {
        let mut nodes = Map::new();
        for i in 0..count {
            let ua = if tor_every > 0 && i % tor_every == 0 {
                "/Satoshi:27.0.0(tor)/"
            } else {
                "/Satoshi:27.0.0/"
            };
            nodes.insert(format!("10.1.{}.{}:8333", i / 256, i % 256), json!([70016, ua]));
        }
        nodes
    }

    #[rstest]
    #[case(0.0)]
    #[case(15.0)]
    #[case(-3.0)]
    #[case(100.0)]
    fn test_tor_trend_zero_baseline(#[case] current: f64) {
        assert_eq!(tor_trend(current, 0.0), 0.0);
        assert_eq!(tor_trend_with(TrendRepresentation::Fraction, current, 0.0), 0.0);
    }

    #[test]
    fn test_tor_trend_relative_change() {
        assert!((tor_trend(11.0, 10.0) - 10.0).abs() < 1e-9);
        assert!((tor_trend(9.0, 10.0) + 10.0).abs() < 1e-9);
        assert!((tor_trend_with(TrendRepresentation::Fraction, 11.0, 10.0) - 0.1).abs() < 1e-12);
    }

    #[rstest]
    #[case(1.5, MarketBias::SellBias)]
    #[case(1.0, MarketBias::Neutral)]
    #[case(0.0, MarketBias::Neutral)]
    #[case(-1.0, MarketBias::Neutral)]
    #[case(-1.01, MarketBias::BuyBias)]
    fn test_tor_market_bias(#[case] trend: f64, #[case] expected: MarketBias) {
        assert_eq!(tor_market_bias(trend), expected);
    }

    #[rstest]
    #[case(0.002, MarketBias::BuyBias)]
    #[case(0.001, MarketBias::Neutral)]
    #[case(-0.0015, MarketBias::SellBias)]
    fn test_fractional_bias_rule(#[case] trend: f64, #[case] expected: MarketBias) {
        assert_eq!(classify_bias(trend, &BiasRule::fractional()), expected);
    }

    #[test]
    fn test_bias_labels() {
        assert_eq!(MarketBias::SellBias.to_string(), "SELL BIAS");
        assert_eq!(MarketBias::BuyBias.to_string(), "BUY BIAS");
        assert_eq!(MarketBias::Neutral.to_string(), "NEUTRAL");
    }

    #[rstest]
    #[case(0.02, NetworkSignal::Buy)]
    #[case(0.01, NetworkSignal::Sideways)]
    #[case(-0.01, NetworkSignal::Sideways)]
    #[case(-0.05, NetworkSignal::Sell)]
    fn test_network_signal_label(#[case] signal: f64, #[case] expected: NetworkSignal) {
        assert_eq!(network_signal_label(signal), expected);
    }

    #[test]
    fn test_network_signal_without_baseline() {
        let current = snapshot(t(), 10_000, 15.0);
        assert_eq!(network_signal(&current, None), 0.0);
    }

    #[test]
    fn test_network_signal_zero_totals() {
        let empty = snapshot(t(), 0, 0.0);
        let full = snapshot(t(), 10_000, 15.0);

        assert_eq!(network_signal(&full, Some(&empty)), 0.0);
        assert_eq!(network_signal(&empty, Some(&full)), 0.0);
    }

    #[test]
    fn test_network_signal_uses_active_ratio() {
        let previous = snapshot(t(), 1_000, 10.0);
        let mut current = snapshot(t(), 1_100, 10.0);
        current.active_nodes = 550;

        assert!((network_signal(&current, Some(&previous)) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_growth_scenario() {
        let a = snapshot(t() - TimeDelta::minutes(10), 10_000, 15.0);
        let b = snapshot(t(), 10_500, 15.0);

        let report = evaluate(&b, Some(&a), &SignalRules::default());
        let tor = report.tor.unwrap();

        assert_eq!(tor.trend, 0.0);
        assert_eq!(tor.bias, MarketBias::Neutral);
        assert!((report.network_signal - 0.05).abs() < 1e-12);
        assert_eq!(report.network_label, NetworkSignal::Buy);
    }

    #[test]
    fn test_evaluate_without_baseline() {
        let current = snapshot(t(), 10_000, 15.0);
        let report = evaluate(&current, None, &SignalRules::default());

        assert!(report.tor.is_none());
        assert_eq!(report.network_signal, 0.0);
        assert_eq!(report.network_label, NetworkSignal::Sideways);
    }

    #[test]
    fn test_evaluate_with_fractional_rule() {
        let rules = SignalRules {
            bias: BiasRule::fractional(),
            network_threshold: 0.01,
        };
        let previous = snapshot(t() - TimeDelta::hours(1), 10_000, 10.0);
        let current = snapshot(t(), 10_000, 10.05);

        let tor = evaluate(&current, Some(&previous), &rules).tor.unwrap();
        assert!((tor.trend - 0.005).abs() < 1e-9);
        assert_eq!(tor.representation, TrendRepresentation::Fraction);
        assert_eq!(tor.bias, MarketBias::BuyBias);
    }

    #[test]
    fn test_custom_bias_polarity() {
        let rule = BiasRule {
            representation: TrendRepresentation::Percentage,
            threshold: 5.0,
            polarity: BiasPolarity::RisingIsBullish,
        };
        assert_eq!(classify_bias(6.0, &rule), MarketBias::BuyBias);
        assert_eq!(classify_bias(4.0, &rule), MarketBias::Neutral);
        assert_eq!(classify_bias(-6.0, &rule), MarketBias::SellBias);
    }

    #[test]
    fn test_nearest_previous_prefers_closer_record() {
        let records = vec![
            snapshot(t() - TimeDelta::hours(48), 1, 0.0),
            snapshot(t() - TimeDelta::hours(25), 2, 0.0),
            snapshot(t() - TimeDelta::hours(23), 3, 0.0),
            snapshot(t() - TimeDelta::hours(1), 4, 0.0),
        ];

        let nearest = nearest_previous(&records, t() - TimeDelta::hours(24)).unwrap();
        assert_eq!(nearest.total_nodes, 3);
    }

    #[test]
    fn test_nearest_previous_skips_most_recent() {
        let records = vec![
            snapshot(t() - TimeDelta::hours(30), 1, 0.0),
            snapshot(t() - TimeDelta::hours(24), 2, 0.0),
        ];

        let nearest = nearest_previous(&records, t() - TimeDelta::hours(24)).unwrap();
        assert_eq!(nearest.total_nodes, 1);
    }

    #[test]
    fn test_nearest_previous_tie_goes_to_later() {
        let records = vec![
            snapshot(t() - TimeDelta::hours(25), 1, 0.0),
            snapshot(t() - TimeDelta::hours(23), 2, 0.0),
            snapshot(t(), 3, 0.0),
        ];

        let nearest = nearest_previous(&records, t() - TimeDelta::hours(24)).unwrap();
        assert_eq!(nearest.total_nodes, 2);
    }

    #[test]
    fn test_nearest_previous_without_tie() {
        let records = vec![
            snapshot(t() - TimeDelta::hours(26), 1, 0.0),
            snapshot(t() - TimeDelta::hours(23), 2, 0.0),
            snapshot(t() - TimeDelta::hours(21), 3, 0.0),
            snapshot(t(), 4, 0.0),
        ];

        let nearest = nearest_previous(&records, t() - TimeDelta::hours(24)).unwrap();
        assert_eq!(nearest.total_nodes, 2);
    }

    #[test]
    fn test_nearest_previous_needs_two_records() {
        assert!(nearest_previous(&[], t()).is_none());
        assert!(nearest_previous(&[snapshot(t(), 1, 0.0)], t()).is_none());
    }

    #[test]
    fn test_tor_percentage_caps_sample() {
        let nodes = node_map(1500, 4);
        assert_eq!(tor_percentage(&nodes, 1000), 25.0);
    }

    #[test]
    fn test_tor_percentage_small_and_empty() {
        assert_eq!(tor_percentage(&Map::new(), 1000), 0.0);
        assert_eq!(tor_percentage(&node_map(10, 0), 1000), 0.0);
        assert_eq!(tor_percentage(&node_map(10, 1), 1000), 100.0);
    }

    #[test]
    fn test_tor_percentage_counts_malformed_in_denominator() {
        let mut nodes = node_map(3, 1);
        nodes.insert("bad:8333".to_string(), json!(null));
        assert_eq!(tor_percentage(&nodes, 1000), 75.0);
    }

    #[test]
    fn test_recent_tor_series_window() {
        let records: Vec<_> = (0..200)
            .map(|i| snapshot(t() - TimeDelta::minutes(10 * (199 - i)), i as u64, i as f64))
            .collect();

        let series = recent_tor_series(&records, t(), TimeDelta::hours(24));
        assert_eq!(series.len(), 144);
        assert_eq!(series.first().unwrap().tor_percentage, 56.0);
        assert_eq!(series.last().unwrap().tor_percentage, 199.0);
    }

    #[test]
    fn test_recent_tor_series_falls_back_to_tail() {
        let records: Vec<_> = (0..30)
            .map(|i| snapshot(t() - TimeDelta::days(10) + TimeDelta::minutes(i), 1, i as f64))
            .collect();

        let series = recent_tor_series(&records, t(), TimeDelta::hours(24));
        assert_eq!(series.len(), 24);
        assert_eq!(series.first().unwrap().tor_percentage, 6.0);
    }

    #[test]
    fn test_recent_tor_series_needs_two_points() {
        let records = vec![snapshot(t(), 1, 1.0)];
        assert!(recent_tor_series(&records, t(), TimeDelta::hours(24)).is_empty());
    }
}
