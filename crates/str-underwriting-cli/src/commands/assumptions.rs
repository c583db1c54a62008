use serde_json::Value;

use str_underwriting_core::underwriting::assumptions::Assumptions;

/// Echo the assumptions in effect; with no `--assumptions` file these are
/// the defaults, ready to save and edit.
pub fn run_assumptions(assumptions: &Assumptions) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(assumptions)?)
}
