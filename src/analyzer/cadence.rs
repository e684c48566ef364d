use crate::model::{DividendEvent, PaymentPattern};
use crate::utils::{mean, population_std_dev};

/// Classifies the payment cadence from the day gaps between consecutive
/// events. Bands are checked in priority order; anything outside them is
/// irregular.
pub fn classify(events: &[DividendEvent]) -> PaymentPattern {
    if events.len() < 3 {
        return PaymentPattern::InsufficientData;
    }

    let gaps: Vec<f64> = events
        .windows(2)
        .map(|pair| (pair[1].payment_date - pair[0].payment_date).num_days() as f64)
        .collect();

    if gaps.is_empty() {
        return PaymentPattern::Irregular;
    }

    let avg = mean(&gaps);
    let spread = population_std_dev(&gaps);

    if (25.0..=35.0).contains(&avg) && spread < 10.0 {
        PaymentPattern::Monthly
    } else if (80.0..=100.0).contains(&avg) && spread < 20.0 {
        PaymentPattern::Quarterly
    } else if (170.0..=190.0).contains(&avg) && spread < 30.0 {
        PaymentPattern::SemiAnnual
    } else if (350.0..=380.0).contains(&avg) && spread < 40.0 {
        PaymentPattern::Annual
    } else {
        PaymentPattern::Irregular
    }
}
