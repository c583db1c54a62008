use serde_json::Value;
use std::io;

use super::{flatten, warnings};

/// Write the report to stdout as `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(value, stdout.lock()) {
        eprintln!("CSV output error: {e}");
    }
}

fn write_csv<W: io::Write>(value: &Value, out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["field", "value"])?;

    match value {
        Value::Object(_) => {
            for (key, val) in flatten(value) {
                wtr.write_record([key, format_csv_value(&val)])?;
            }
            for (i, w) in warnings(value).into_iter().enumerate() {
                wtr.write_record([format!("warnings.{i}"), w.to_string()])?;
            }
        }
        _ => wtr.write_record(["value".to_string(), format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
