use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use emi_core::amortization::{self, LoanTerms};
use emi_core::comparison::{self, MetricsSnapshot};
use emi_core::prepayment::{self, PrepaymentPlan};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let input: emi_core::analysis::LoanAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emi_core::analysis::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn baseline_schedule(terms_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let schedule = amortization::build_baseline(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn yearly_summary(terms_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&terms_json).map_err(to_napi_error)?;
    let schedule = amortization::build_baseline(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&amortization::summarize_by_year(&schedule)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Prepayments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ResolveRequest {
    terms: LoanTerms,
    plan: PrepaymentPlan,
}

/// Month-keyed prepayment amounts for a plan. Invalid rows come back as an
/// error whose message lists every offending row.
#[napi]
pub fn resolve_prepayments(request_json: String) -> NapiResult<String> {
    let request: ResolveRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    request.terms.validate().map_err(to_napi_error)?;
    let emi = amortization::compute_loan_emi(&request.terms).map_err(to_napi_error)?;
    let map = prepayment::resolve_prepayments(
        &request.plan,
        request.terms.start_date,
        request.terms.total_months(),
        emi,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&map).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CompareRequest {
    baseline: MetricsSnapshot,
    current: MetricsSnapshot,
}

#[napi]
pub fn compare_snapshots(request_json: String) -> NapiResult<String> {
    let request: CompareRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output =
        comparison::compare(&request.baseline, &request.current).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
