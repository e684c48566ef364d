// Analyzer module: cadence classification, monthly aggregation, prediction
// and the per-ticker orchestration that composes them.

pub mod cadence;
pub mod monthly;
pub mod prediction;

use crate::model::StockAnalysis;
use crate::normalizer::{self, Diagnostics};
use crate::parser;
use crate::utils::mean;
use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Runs the full analysis for one ticker: normalize, classify the cadence,
/// aggregate monthly statistics over the trailing window, predict the next
/// payment. Returns `None` when normalization yields no events.
///
/// `now` is injected so a run is deterministic for a fixed input.
pub fn analyze_stock(
    ticker: &str,
    payload: &Value,
    window_years: Option<u32>,
    now: DateTime<Utc>,
    diagnostics: &mut Diagnostics,
) -> Option<StockAnalysis> {
    let records = parser::provent_records(payload);
    let events = normalizer::normalize_events(ticker, records, diagnostics);
    if events.is_empty() {
        warn!(ticker, "no usable dividend events");
        return None;
    }

    let pattern = cadence::classify(&events);
    let stats = monthly::monthly_statistics(&events, window_years, now);

    // Reporting totals use the full history, not the windowed view. Annual
    // totals are summed per year first so payment-heavy years are not
    // overweighted per event.
    let mut annual_totals: BTreeMap<i32, f64> = BTreeMap::new();
    for event in &events {
        *annual_totals.entry(event.payment_date.year()).or_insert(0.0) += event.value;
    }
    let per_year_sums: Vec<f64> = annual_totals.values().copied().collect();

    let next_payment_prediction = prediction::predict_next_payment(&events, &stats, pattern, now);
    let confidence_score = stats.mean_confidence();

    Some(StockAnalysis {
        ticker: ticker.to_string(),
        total_years_analyzed: annual_totals.len(),
        total_dividends_paid: events.len(),
        average_annual_dividends: mean(&per_year_sums),
        monthly_statistics: stats,
        payment_pattern: pattern,
        next_payment_prediction,
        confidence_score,
        last_update: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentPattern;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    fn xpto_payload() -> Value {
        json!({
            "assetEarningsModels": [
                {"et": "Dividendo", "pd": "15/03/2023", "v": 1.00},
                {"et": "Dividendo", "pd": "15/03/2024", "v": 1.20},
                {"et": "Dividendo", "pd": "15/03/2025", "v": 1.10}
            ]
        })
    }

    #[test]
    fn end_to_end_annual_payer() {
        let mut diagnostics = Diagnostics::default();
        let analysis =
            analyze_stock("XPTO", &xpto_payload(), Some(3), fixed_now(), &mut diagnostics)
                .unwrap();

        assert_eq!(analysis.payment_pattern, PaymentPattern::Annual);
        assert_eq!(analysis.total_years_analyzed, 3);
        assert_eq!(analysis.total_dividends_paid, 3);
        assert_eq!(analysis.monthly_statistics.len(), 1);

        let mar = analysis.monthly_statistics.get("MAR").unwrap();
        assert_eq!(mar.probability, 1.0);
        assert!((mar.average_value - 1.10).abs() < 1e-12);
        assert_eq!(mar.confidence_score, 1.0);

        let prediction = analysis.next_payment_prediction.unwrap();
        assert_eq!(prediction.predicted_month, "MAR");
        assert_eq!(
            prediction.predicted_date,
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert_eq!(prediction.probability, 1.0);
        assert!((prediction.expected_value - 1.10).abs() < 1e-12);
    }

    #[test]
    fn average_annual_dividends_averages_per_year_sums() {
        // 50 + 50 in one year, 200 in the next: (100 + 200) / 2, not the
        // flat mean of three events.
        let payload = json!({
            "assetEarningsModels": [
                {"et": "Dividendo", "pd": "10/04/2024", "v": 50.0},
                {"et": "Dividendo", "pd": "10/10/2024", "v": 50.0},
                {"et": "JCP", "pd": "10/04/2025", "v": 200.0}
            ]
        });
        let mut diagnostics = Diagnostics::default();
        let analysis =
            analyze_stock("TEST3", &payload, None, fixed_now(), &mut diagnostics).unwrap();

        assert_eq!(analysis.average_annual_dividends, 150.0);
        assert_eq!(analysis.total_years_analyzed, 2);
    }

    #[test]
    fn zero_valid_records_yields_absence() {
        let mut diagnostics = Diagnostics::default();
        assert!(analyze_stock("EMPTY3", &json!({}), Some(3), fixed_now(), &mut diagnostics)
            .is_none());

        let all_invalid = json!({
            "assetEarningsModels": [
                {"et": "Subscrição", "pd": "15/03/2024", "v": 1.0},
                {"et": "Dividendo", "pd": "garbage", "v": 1.0}
            ]
        });
        assert!(
            analyze_stock("BAD3", &all_invalid, Some(3), fixed_now(), &mut diagnostics).is_none()
        );
        assert_eq!(diagnostics.skipped(), 2);
    }

    #[test]
    fn same_input_and_now_is_bit_identical() {
        let mut first_diag = Diagnostics::default();
        let mut second_diag = Diagnostics::default();
        let first =
            analyze_stock("XPTO", &xpto_payload(), Some(3), fixed_now(), &mut first_diag).unwrap();
        let second =
            analyze_stock("XPTO", &xpto_payload(), Some(3), fixed_now(), &mut second_diag)
                .unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn overall_confidence_is_mean_of_monthly_confidences() {
        // MAR has 3 occurrences (confidence 1.0), AGO has 1 (1/3).
        let payload = json!({
            "assetEarningsModels": [
                {"et": "Dividendo", "pd": "15/03/2023", "v": 1.0},
                {"et": "Dividendo", "pd": "15/03/2024", "v": 1.0},
                {"et": "Dividendo", "pd": "15/03/2025", "v": 1.0},
                {"et": "Dividendo", "pd": "20/08/2025", "v": 0.5}
            ]
        });
        let mut diagnostics = Diagnostics::default();
        let analysis =
            analyze_stock("TEST3", &payload, None, fixed_now(), &mut diagnostics).unwrap();

        let expected = (1.0 + 1.0 / 3.0) / 2.0;
        assert!((analysis.confidence_score - expected).abs() < 1e-12);
    }
}
