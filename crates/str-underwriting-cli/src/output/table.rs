use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_value, warnings};

/// Print the report as a two-column Field/Value table, then any warnings.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(_) => {
            println!("{}", build_table(value));
            print_warnings(value);
        }
        _ => println!("{}", format_value(value)),
    }
}

fn build_table(value: &Value) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, format_value(&val)]);
    }
    builder.build()
}

fn print_warnings(value: &Value) {
    let warnings = warnings(value);
    if warnings.is_empty() {
        return;
    }
    println!("\nWarnings:");
    for w in warnings {
        println!("  - {w}");
    }
}
