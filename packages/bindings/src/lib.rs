use napi::Result as NapiResult;
use napi_derive::napi;

use str_underwriting_core::underwriting::assumptions::{Assumptions, FinancialInputs};
use str_underwriting_core::underwriting::summarize_financing;
use str_underwriting_core::{underwrite, UnderwritingRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse optional assumption overrides; absent keys keep their defaults.
fn parse_assumptions(assumptions_json: Option<String>) -> NapiResult<Assumptions> {
    match assumptions_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(Assumptions::default()),
    }
}

// ---------------------------------------------------------------------------
// Underwriting
// ---------------------------------------------------------------------------

/// Full underwriting report for `{subject_property, comparable_properties?, financial_inputs?}`.
#[napi]
pub fn analyze_property(request_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let request: UnderwritingRequest =
        serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let report = underwrite(&request, &assumptions).map_err(to_napi_error)?;
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn financing_summary(inputs_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let inputs: FinancialInputs = serde_json::from_str(&inputs_json).map_err(to_napi_error)?;
    let assumptions = parse_assumptions(assumptions_json)?;
    let output = summarize_financing(&inputs, &assumptions).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[napi]
pub fn default_assumptions() -> NapiResult<String> {
    serde_json::to_string(&Assumptions::default()).map_err(to_napi_error)
}
