use serde_json::Value;

use super::{flatten, format_value};

/// Headline figures, most decision-relevant first.
const PRIORITY_KEYS: [&str; 5] = [
    "average_case_roi_percent",
    "cash_on_cash_return_percent",
    "monthly_mortgage_payment",
    "average_daily_rate",
    "down_payment_percent",
];

/// Print the single most useful number in the output.
///
/// Matches the last path segment against [`PRIORITY_KEYS`], then falls back
/// to the first leaf.
pub fn print_minimal(value: &Value) {
    println!("{}", pick_headline(value));
}

fn pick_headline(value: &Value) -> String {
    let rows = flatten(value);

    for wanted in PRIORITY_KEYS {
        let hit = rows
            .iter()
            .find(|(key, val)| key.rsplit('.').next() == Some(wanted) && !val.is_null());
        if let Some((_, val)) = hit {
            return format_value(val);
        }
    }

    match rows.first() {
        Some((key, val)) => format!("{key}: {}", format_value(val)),
        None => format_value(value),
    }
}
