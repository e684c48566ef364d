use crate::model::{DividendEvent, EventKind};
use crate::parser;
use crate::utils::parse_br_date;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Record lacks a kind or payment-date field entirely.
    MissingField,
    /// Kind is outside the modeled set (capital return, subscription, ...).
    UnsupportedKind,
    InvalidPaymentDate,
    InvalidValue,
    NonPositiveValue,
}

/// Collector for records dropped during normalization, so skip counts are
/// observable without relying on ambient logging.
#[derive(Debug, Default)]
pub struct Diagnostics {
    skips: Vec<SkipReason>,
}

impl Diagnostics {
    pub fn record(&mut self, reason: SkipReason) {
        self.skips.push(reason);
    }

    pub fn skipped(&self) -> usize {
        self.skips.len()
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.skips.iter().filter(|r| **r == reason).count()
    }
}

/// Converts raw provent records into validated events, sorted ascending by
/// payment date. Malformed records are skipped individually; normalization
/// never aborts because of one bad record.
pub fn normalize_events(
    ticker: &str,
    records: &[Value],
    diagnostics: &mut Diagnostics,
) -> Vec<DividendEvent> {
    let mut events = Vec::new();

    for item in records {
        match normalize_record(ticker, item) {
            Ok(event) => events.push(event),
            Err(reason) => {
                debug!(ticker, ?reason, "skipping provent record");
                diagnostics.record(reason);
            }
        }
    }

    // Stable: records sharing a payment date keep their input order.
    events.sort_by_key(|e| e.payment_date);
    events
}

fn normalize_record(ticker: &str, item: &Value) -> Result<DividendEvent, SkipReason> {
    let raw = parser::extract(item).ok_or(SkipReason::MissingField)?;
    let kind = EventKind::from_raw(raw.kind).ok_or(SkipReason::UnsupportedKind)?;
    let payment_date = parse_br_date(raw.payment_date).ok_or(SkipReason::InvalidPaymentDate)?;
    let value = raw.value.ok_or(SkipReason::InvalidValue)?;
    if value <= 0.0 {
        return Err(SkipReason::NonPositiveValue);
    }
    // A broken ex-date does not invalidate the event, it is simply omitted.
    let ex_date = raw.ex_date.and_then(parse_br_date);

    Ok(DividendEvent {
        ticker: ticker.to_string(),
        kind,
        value,
        payment_date,
        ex_date,
        yield_percent: raw.yield_percent,
    })
}
