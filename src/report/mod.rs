// Report rendering: Markdown for humans, JSON for downstream tooling.
use crate::model::{StockAnalysis, MONTHS};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Batch result: one slot per requested ticker, `None` when no analysis is
/// available.
pub type AnalysisBatch = BTreeMap<String, Option<StockAnalysis>>;

#[derive(Debug, Serialize)]
struct ReportMetadata {
    generated_at: DateTime<Utc>,
    years_analyzed: u32,
    total_stocks: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    metadata: ReportMetadata,
    analyses: &'a AnalysisBatch,
}

pub fn render_json(
    analyses: &AnalysisBatch,
    years_analyzed: u32,
    now: DateTime<Utc>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        metadata: ReportMetadata {
            generated_at: now,
            years_analyzed,
            total_stocks: analyses.len(),
        },
        analyses,
    })
}

pub fn render_markdown(analyses: &AnalysisBatch, years_analyzed: u32, now: DateTime<Utc>) -> String {
    let mut md = String::new();
    md.push_str("# Dividend Forecast\n\n");
    let _ = writeln!(md, "**Generated:** {}  ", now.format("%d/%m/%Y %H:%M"));
    let _ = writeln!(md, "**Window:** last {} years\n", years_analyzed);

    let with_predictions = analyses
        .values()
        .filter(|a| a.as_ref().is_some_and(|a| a.next_payment_prediction.is_some()))
        .count();
    md.push_str("## Summary\n\n");
    let _ = writeln!(md, "- Tickers analyzed: {}", analyses.len());
    let _ = writeln!(md, "- Tickers with a prediction: {}\n", with_predictions);

    push_probability_table(&mut md, analyses);
    push_predictions(&mut md, analyses);
    push_details(&mut md, analyses);

    md.push_str("---\n");
    let _ = writeln!(
        md,
        "*Report generated automatically at {}*",
        now.format("%d/%m/%Y %H:%M")
    );
    md
}

fn push_probability_table(md: &mut String, analyses: &AnalysisBatch) {
    md.push_str("## Payment probability by month\n\n");
    md.push_str("| Ticker |");
    for month in MONTHS {
        let _ = write!(md, " {} |", month);
    }
    md.push('\n');
    md.push_str("|--------|");
    md.push_str(&"-------|".repeat(12));
    md.push('\n');

    for (ticker, analysis) in analyses {
        let Some(analysis) = analysis else { continue };
        let _ = write!(md, "| **{}** |", ticker);
        for month in MONTHS {
            match analysis.monthly_statistics.get(month) {
                Some(row) => {
                    let _ = write!(
                        md,
                        " {:.0}% (R${:.2}) |",
                        row.probability * 100.0,
                        row.average_value
                    );
                }
                None => md.push_str(" - |"),
            }
        }
        md.push('\n');
    }
    md.push('\n');
}

fn push_predictions(md: &mut String, analyses: &AnalysisBatch) {
    md.push_str("## Upcoming payment predictions\n\n");

    let mut predictions: Vec<_> = analyses
        .iter()
        .filter_map(|(ticker, analysis)| {
            analysis
                .as_ref()
                .and_then(|a| a.next_payment_prediction.as_ref())
                .map(|p| (ticker, p))
        })
        .collect();
    predictions.sort_by_key(|(_, p)| p.predicted_date);

    if predictions.is_empty() {
        md.push_str("*No prediction cleared the confidence threshold.*\n\n");
        return;
    }

    for (ticker, prediction) in predictions {
        let _ = writeln!(md, "### {}", ticker);
        let _ = writeln!(md, "- **Month:** {}", prediction.predicted_month);
        let _ = writeln!(md, "- **Estimated date:** {}", prediction.predicted_date);
        let _ = writeln!(md, "- **Probability:** {:.0}%", prediction.probability * 100.0);
        let _ = writeln!(md, "- **Expected value:** R$ {:.2}", prediction.expected_value);
        let _ = writeln!(
            md,
            "- **Confidence:** {:.0}%\n",
            prediction.confidence_score * 100.0
        );
    }
}

fn push_details(md: &mut String, analyses: &AnalysisBatch) {
    md.push_str("## Detail by ticker\n\n");

    for (ticker, analysis) in analyses {
        let _ = writeln!(md, "### {}\n", ticker);
        let Some(analysis) = analysis else {
            md.push_str("*No analysis available.*\n\n");
            continue;
        };

        let _ = writeln!(md, "**Payment pattern:** {}  ", analysis.payment_pattern);
        let _ = writeln!(md, "**Years analyzed:** {}  ", analysis.total_years_analyzed);
        let _ = writeln!(md, "**Total payments:** {}  ", analysis.total_dividends_paid);
        let _ = writeln!(
            md,
            "**Average annual total:** R$ {:.2}  ",
            analysis.average_annual_dividends
        );
        let _ = writeln!(
            md,
            "**Overall confidence:** {:.0}%\n",
            analysis.confidence_score * 100.0
        );

        if !analysis.monthly_statistics.is_empty() {
            md.push_str("**Strongest months:**\n\n");
            let mut months: Vec<_> = analysis.monthly_statistics.iter().collect();
            months.sort_by(|a, b| b.probability.total_cmp(&a.probability));
            for row in months.into_iter().take(6) {
                let _ = writeln!(
                    md,
                    "- **{}:** {:.0}% probability | R$ {:.2} average | {} occurrences",
                    row.month,
                    row.probability * 100.0,
                    row.average_value,
                    row.occurrences
                );
            }
            md.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer;
    use crate::normalizer::Diagnostics;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    fn sample_batch() -> AnalysisBatch {
        let payload = json!({
            "assetEarningsModels": [
                {"et": "Dividendo", "pd": "15/03/2023", "v": 1.00},
                {"et": "Dividendo", "pd": "15/03/2024", "v": 1.20},
                {"et": "Dividendo", "pd": "15/03/2025", "v": 1.10}
            ]
        });
        let mut diagnostics = Diagnostics::default();
        let analysis = analyzer::analyze_stock("XPTO", &payload, Some(3), fixed_now(), &mut diagnostics);

        let mut batch = AnalysisBatch::new();
        batch.insert("XPTO".to_string(), analysis);
        batch.insert("MISS3".to_string(), None);
        batch
    }

    #[test]
    fn markdown_shows_populated_and_absent_months() {
        let md = render_markdown(&sample_batch(), 3, fixed_now());

        assert!(md.contains("| **XPTO** |"));
        assert!(md.contains("100% (R$1.10)"));
        assert!(md.contains(" - |"));
        assert!(md.contains("*No analysis available.*"));
        assert!(md.contains("- **Estimated date:** 2026-03-15"));
    }

    #[test]
    fn json_report_keeps_one_slot_per_ticker() {
        let json_text = render_json(&sample_batch(), 3, fixed_now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_text).unwrap();

        assert_eq!(value["metadata"]["total_stocks"], 2);
        assert!(value["analyses"]["MISS3"].is_null());
        assert_eq!(value["analyses"]["XPTO"]["payment_pattern"], "annual");
        assert_eq!(
            value["analyses"]["XPTO"]["next_payment_prediction"]["predicted_date"],
            "2026-03-15"
        );
        assert_eq!(
            value["analyses"]["XPTO"]["monthly_statistics"]["MAR"]["probability"],
            1.0
        );
    }
}
