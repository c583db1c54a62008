use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use str_underwriting_core::underwriting::assumptions::{Assumptions, FinancialInputs};
use str_underwriting_core::underwriting::summarize_financing;

use crate::input;

/// Arguments for the financing summary. Percentages are quoted as on a
/// term sheet: 20 means 20%.
#[derive(Args)]
pub struct FinancingArgs {
    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Down payment as a percent of price (e.g. 25)
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Annual loan interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub loan_interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term_years: Option<u32>,

    #[arg(long)]
    pub closing_costs: Option<Decimal>,

    #[arg(long)]
    pub renovation_costs: Option<Decimal>,

    /// Furnishing and setup costs
    #[arg(long)]
    pub furniture_costs: Option<Decimal>,

    /// Path to JSON financial inputs (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_financing(
    args: FinancingArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = collect_inputs(&args, input::stdin::read_stdin)?;
    let output = summarize_financing(&inputs, assumptions)?;
    Ok(serde_json::to_value(output)?)
}

/// `--input` wins, then explicit flags, then piped stdin. Stdin is only read
/// when neither a file nor `--purchase-price` was given.
fn collect_inputs<F>(
    args: &FinancingArgs,
    read_stdin: F,
) -> Result<FinancialInputs, Box<dyn std::error::Error>>
where
    F: FnOnce() -> Result<Option<Value>, Box<dyn std::error::Error>>,
{
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(purchase_price) = args.purchase_price {
        return Ok(FinancialInputs {
            purchase_price: Some(purchase_price),
            down_payment_percent: args.down_payment_percent,
            loan_interest_rate: args.loan_interest_rate,
            loan_term_years: args.loan_term_years,
            closing_costs: args.closing_costs,
            renovation_costs: args.renovation_costs,
            furniture_costs: args.furniture_costs,
            ..Default::default()
        });
    }
    match read_stdin()? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err("--purchase-price is required (or provide --input)".into()),
    }
}
