// Core structs: DividendEvent, MonthlyStatistic, StockAnalysis, Prediction
use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Month labels (pt-BR), calendar order.
pub const MONTHS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

pub fn month_label(month0: usize) -> &'static str {
    MONTHS[month0]
}

pub fn month_index(label: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == label)
}

/// Provent kinds the engine models. Everything else (capital returns,
/// subscription rights) is out of scope and skipped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    #[serde(rename = "Dividendo")]
    Dividend,
    #[serde(rename = "JCP")]
    InterestOnEquity,
}

impl EventKind {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "Dividendo" => Some(Self::Dividend),
            "JCP" => Some(Self::InterestOnEquity),
            _ => None,
        }
    }
}

/// One recorded dividend payment. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct DividendEvent {
    pub ticker: String,
    pub kind: EventKind,
    pub value: f64,
    pub payment_date: NaiveDate,
    pub ex_date: Option<NaiveDate>,
    pub yield_percent: Option<f64>,
}

/// Statistics for dividends falling in one calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStatistic {
    pub month: &'static str,
    pub probability: f64,
    pub average_value: f64,
    pub median_value: f64,
    pub std_deviation: f64,
    pub occurrences: usize,
    pub years_occurred: Vec<i32>,
    pub confidence_score: f64,
}

/// Monthly rows in calendar order (JAN..DEZ), months without events omitted.
/// Serializes as a map keyed by month label, preserving that order.
#[derive(Debug, Clone, Default)]
pub struct MonthlyStatistics(Vec<MonthlyStatistic>);

impl MonthlyStatistics {
    pub fn new(rows: Vec<MonthlyStatistic>) -> Self {
        Self(rows)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyStatistic> {
        self.0.iter()
    }

    pub fn get(&self, month: &str) -> Option<&MonthlyStatistic> {
        self.0.iter().find(|s| s.month == month)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mean of the monthly confidence scores, 0 when no month is present.
    pub fn mean_confidence(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.iter().map(|s| s.confidence_score).sum::<f64>() / self.0.len() as f64
    }
}

impl Serialize for MonthlyStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for row in &self.0 {
            map.serialize_entry(row.month, row)?;
        }
        map.end()
    }
}

/// Payment cadence inferred from the gaps between consecutive events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentPattern {
    #[serde(rename = "insufficient_data")]
    InsufficientData,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "quarterly")]
    Quarterly,
    #[serde(rename = "semi-annual")]
    SemiAnnual,
    #[serde(rename = "annual")]
    Annual,
    #[serde(rename = "irregular")]
    Irregular,
}

impl PaymentPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnual => "semi-annual",
            Self::Annual => "annual",
            Self::Irregular => "irregular",
        }
    }
}

impl fmt::Display for PaymentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projected next payment, always embedded in a StockAnalysis.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub predicted_month: &'static str,
    pub predicted_date: NaiveDate,
    pub probability: f64,
    pub expected_value: f64,
    pub confidence_score: f64,
    pub based_on_pattern: PaymentPattern,
}

/// Complete dividend analysis for one ticker. Produced once per run,
/// read-only afterward.
#[derive(Debug, Clone, Serialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub total_years_analyzed: usize,
    pub total_dividends_paid: usize,
    pub average_annual_dividends: f64,
    pub monthly_statistics: MonthlyStatistics,
    pub payment_pattern: PaymentPattern,
    pub next_payment_prediction: Option<Prediction>,
    pub confidence_score: f64,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request for {ticker} failed: {message}")]
    Http { ticker: String, message: String },
    #[error("unexpected status {status} for {ticker}")]
    Status { ticker: String, status: u16 },
    #[error("retries exhausted for {ticker}")]
    RetriesExhausted { ticker: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("corrupt cache entry for {0}")]
    Corrupt(String),
}
