//! One-shot loan analysis: baseline, optional prepayment plan, savings.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{LoanTerms, YearSummary};
use crate::comparison::{MetricsSnapshot, SavingsReport};
use crate::config::CalculatorConfig;
use crate::prepayment::PrepaymentPlan;
use crate::session::LoanSession;
use crate::types::{with_metadata, ComputationOutput};
use crate::EmiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisInput {
    pub terms: LoanTerms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayments: Option<PrepaymentPlan>,
    #[serde(default)]
    pub config: CalculatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysisOutput {
    pub baseline: MetricsSnapshot,
    /// Prepayment-adjusted snapshot, present when a plan was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<MetricsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<SavingsReport>,
    /// Year roll-up of the effective (adjusted if any) schedule.
    pub yearly_summary: Vec<YearSummary>,
}

pub fn analyze_loan(
    input: &LoanAnalysisInput,
) -> EmiResult<ComputationOutput<LoanAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut session = LoanSession::new(input.terms.clone(), input.config.clone())?;

    if input.terms.annual_rate_pct <= input.config.inflation_rate_pct {
        warnings.push(format!(
            "Nominal rate {}% does not exceed inflation {}%; inflation-adjusted loss is zero",
            input.terms.annual_rate_pct, input.config.inflation_rate_pct
        ));
    }

    let (current, savings, methodology) = match &input.prepayments {
        Some(plan) => {
            let report = session.apply_plan(plan.clone())?;
            warnings.extend(report.warnings);
            (
                Some(session.current().clone()),
                Some(report.result),
                "Reducing-balance EMI amortization with prepayment replay",
            )
        }
        None => (None, None, "Reducing-balance EMI amortization"),
    };

    let output = LoanAnalysisOutput {
        baseline: session.baseline().clone(),
        current,
        savings,
        yearly_summary: session.yearly_summary(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}
