// StatusInvest payload extraction: the only module that knows the raw schema.
use serde_json::Value;

/// One raw provent row lifted out of the payload, still unvalidated.
/// Field names follow the upstream API: `et` kind, `pd` payment date,
/// `ed` ex-date, `v` value, `y` yield.
#[derive(Debug)]
pub struct RawProvent<'a> {
    pub kind: &'a str,
    pub payment_date: &'a str,
    pub ex_date: Option<&'a str>,
    pub value: Option<f64>,
    pub yield_percent: Option<f64>,
}

/// Returns the raw record array of a payload. A payload without records is
/// valid input and yields an empty slice.
pub fn provent_records(payload: &Value) -> &[Value] {
    payload
        .get("assetEarningsModels")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Total extraction step: a record missing its kind or payment date maps to
/// `None`, never to an error.
pub fn extract(item: &Value) -> Option<RawProvent<'_>> {
    let kind = item.get("et")?.as_str()?;
    let payment_date = item.get("pd")?.as_str()?;
    let ex_date = item
        .get("ed")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty());
    Some(RawProvent {
        kind,
        payment_date,
        ex_date,
        value: numeric_field(item.get("v")),
        yield_percent: numeric_field(item.get("y")),
    })
}

/// The API usually sends numbers but occasionally strings with a comma
/// decimal separator.
fn numeric_field(field: Option<&Value>) -> Option<f64> {
    match field? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_complete_record() {
        let item = json!({
            "et": "Dividendo",
            "pd": "15/03/2023",
            "ed": "10/03/2023",
            "v": 1.25,
            "y": 0.8
        });
        let raw = extract(&item).unwrap();
        assert_eq!(raw.kind, "Dividendo");
        assert_eq!(raw.payment_date, "15/03/2023");
        assert_eq!(raw.ex_date, Some("10/03/2023"));
        assert_eq!(raw.value, Some(1.25));
        assert_eq!(raw.yield_percent, Some(0.8));
    }

    #[test]
    fn missing_kind_or_date_yields_none() {
        assert!(extract(&json!({"pd": "15/03/2023", "v": 1.0})).is_none());
        assert!(extract(&json!({"et": "Dividendo", "v": 1.0})).is_none());
    }

    #[test]
    fn value_as_comma_string_is_parsed() {
        let item = json!({"et": "JCP", "pd": "01/06/2024", "v": "0,37"});
        let raw = extract(&item).unwrap();
        assert_eq!(raw.value, Some(0.37));
        assert_eq!(raw.ex_date, None);
    }

    #[test]
    fn empty_ex_date_is_dropped() {
        let item = json!({"et": "Dividendo", "pd": "01/06/2024", "ed": "  ", "v": 1.0});
        assert_eq!(extract(&item).unwrap().ex_date, None);
    }

    #[test]
    fn payload_without_records_yields_empty_slice() {
        assert!(provent_records(&json!({})).is_empty());
        assert!(provent_records(&json!({"assetEarningsModels": null})).is_empty());
        assert_eq!(
            provent_records(&json!({"assetEarningsModels": [{"et": "JCP"}]})).len(),
            1
        );
    }
}
