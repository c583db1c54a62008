use clap::Args;
use serde_json::Value;

use str_underwriting_core::underwriting::analyze_market;
use str_underwriting_core::underwriting::assumptions::Assumptions;
use str_underwriting_core::UnderwritingRequest;

use crate::input;

/// Arguments for comparable-set market statistics
#[derive(Args)]
pub struct MarketArgs {
    /// Path to JSON request (same shape as `analyze`; financial_inputs is optional)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_market(
    args: MarketArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: UnderwritingRequest =
        input::read_request(args.input.as_deref(), "market statistics")?;
    let output = analyze_market(&request, assumptions)?;
    Ok(serde_json::to_value(output)?)
}
