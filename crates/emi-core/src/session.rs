//! Caller-owned calculation state.
//!
//! A [`LoanSession`] holds the loan terms, the baseline snapshot captured
//! for those terms, and the current (possibly prepayment-adjusted)
//! snapshot. Every operation computes the complete next state before
//! touching `self`; on error the session is left exactly as it was.

use crate::amortization::{build_baseline, summarize_by_year, LoanTerms, YearSummary};
use crate::comparison::{compare, MetricsSnapshot, SavingsReport};
use crate::config::CalculatorConfig;
use crate::prepayment::{apply_prepayments, resolve_prepayments, PrepaymentPlan};
use crate::types::ComputationOutput;
use crate::EmiResult;

#[derive(Debug, Clone)]
pub struct LoanSession {
    config: CalculatorConfig,
    terms: LoanTerms,
    plan: Option<PrepaymentPlan>,
    baseline: MetricsSnapshot,
    current: MetricsSnapshot,
}

impl LoanSession {
    pub fn new(terms: LoanTerms, config: CalculatorConfig) -> EmiResult<Self> {
        Self::build(terms, config, None)
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// The active prepayment plan, if any.
    pub fn plan(&self) -> Option<&PrepaymentPlan> {
        self.plan.as_ref()
    }

    pub fn baseline(&self) -> &MetricsSnapshot {
        &self.baseline
    }

    pub fn current(&self) -> &MetricsSnapshot {
        &self.current
    }

    /// Replace the loan terms. The baseline is re-captured and the active
    /// plan, if any, is re-applied against it.
    pub fn update_terms(&mut self, terms: LoanTerms) -> EmiResult<()> {
        *self = Self::build(terms, self.config.clone(), self.plan.clone())?;
        Ok(())
    }

    pub fn update_config(&mut self, config: CalculatorConfig) -> EmiResult<()> {
        *self = Self::build(self.terms.clone(), config, self.plan.clone())?;
        Ok(())
    }

    /// Apply a prepayment plan in full or not at all.
    pub fn apply_plan(
        &mut self,
        plan: PrepaymentPlan,
    ) -> EmiResult<ComputationOutput<SavingsReport>> {
        let current = recalculate(&self.terms, &self.baseline, &plan, &self.config)?;
        let report = compare(&self.baseline, &current)?;
        self.current = current;
        self.plan = Some(plan);
        Ok(report)
    }

    pub fn clear_prepayments(&mut self) {
        self.plan = None;
        self.current = self.baseline.clone();
    }

    pub fn savings(&self) -> EmiResult<ComputationOutput<SavingsReport>> {
        compare(&self.baseline, &self.current)
    }

    /// Calendar-year roll-up of the current schedule.
    pub fn yearly_summary(&self) -> Vec<YearSummary> {
        summarize_by_year(&self.current.schedule)
    }

    fn build(
        terms: LoanTerms,
        config: CalculatorConfig,
        plan: Option<PrepaymentPlan>,
    ) -> EmiResult<Self> {
        config.validate()?;
        let schedule = build_baseline(&terms)?;
        let baseline = MetricsSnapshot::baseline(&terms, schedule, &config);
        let current = match &plan {
            Some(plan) => recalculate(&terms, &baseline, plan, &config)?,
            None => baseline.clone(),
        };
        Ok(Self {
            config,
            terms,
            plan,
            baseline,
            current,
        })
    }
}

fn recalculate(
    terms: &LoanTerms,
    baseline: &MetricsSnapshot,
    plan: &PrepaymentPlan,
    config: &CalculatorConfig,
) -> EmiResult<MetricsSnapshot> {
    let map = resolve_prepayments(plan, terms.start_date, terms.total_months(), baseline.emi)?;
    let schedule = apply_prepayments(&baseline.schedule, &map, terms)?;
    Ok(MetricsSnapshot::current(terms, schedule, config))
}
