use clap::Args;
use serde_json::Value;

use str_underwriting_core::underwriting::assumptions::Assumptions;
use str_underwriting_core::{underwrite, UnderwritingRequest};

use crate::input;

/// Arguments for a full underwriting report
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON request: subject_property, comparable_properties, financial_inputs
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(
    args: AnalyzeArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: UnderwritingRequest =
        input::read_request(args.input.as_deref(), "underwriting analysis")?;
    let report = underwrite(&request, assumptions)?;
    Ok(serde_json::to_value(report)?)
}
