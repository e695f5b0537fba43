use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use emi_core::analysis::{self, LoanAnalysisInput, LoanAnalysisOutput};
use emi_core::amortization::LoanTerms;
use emi_core::config::CalculatorConfig;
use emi_core::prepayment::{PrepaymentPlan, PrepaymentSpec, PrepaymentTemplate};
use emi_core::ComputationOutput;

use crate::input;

/// Loan terms shared by every loan command
#[derive(Args)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5 for 8.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Repayment tenure in months
    #[arg(long, conflicts_with = "tenure_years")]
    pub tenure_months: Option<u32>,

    /// Repayment tenure in whole years
    #[arg(long)]
    pub tenure_years: Option<u32>,

    /// Interest-only months before repayment starts
    #[arg(long, default_value = "0")]
    pub moratorium_months: u32,

    /// Loan start date as dd-mm-yyyy or dd/mm/yyyy (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Annual inflation rate in percent for the inflation-adjusted loss
    #[arg(long)]
    pub inflation_rate: Option<Decimal>,

    /// Path to a JSON or YAML analysis input (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the baseline schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Emit only the month-by-month schedule entries
    #[arg(long)]
    pub entries: bool,
}

/// Arguments for prepayment analysis
#[derive(Args)]
pub struct PrepayArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Named prepayment template (16-emi)
    #[arg(long, conflicts_with = "prepayments")]
    pub template: Option<PrepaymentTemplate>,

    /// Prepayment row as START:END:AMOUNT, dates dd-mm-yyyy; repeatable
    #[arg(long = "prepayment", value_parser = parse_prepayment)]
    pub prepayments: Vec<PrepaymentSpec>,

    /// Emit only the adjusted month-by-month schedule entries
    #[arg(long)]
    pub entries: bool,
}

/// Arguments for the calendar-year summary
#[derive(Args)]
pub struct YearlyArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Named prepayment template (16-emi)
    #[arg(long, conflicts_with = "prepayments")]
    pub template: Option<PrepaymentTemplate>,

    /// Prepayment row as START:END:AMOUNT, dates dd-mm-yyyy; repeatable
    #[arg(long = "prepayment", value_parser = parse_prepayment)]
    pub prepayments: Vec<PrepaymentSpec>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let analysis_input = build_input(&args.loan, None)?;
    let result = analysis::analyze_loan(&analysis_input)?;
    if args.entries {
        return entries_value(&result);
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_prepay(args: PrepayArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan = plan_from_flags(args.template, &args.prepayments);
    let analysis_input = build_input(&args.loan, plan)?;
    if analysis_input.prepayments.is_none() {
        return Err("--template or --prepayment is required for prepayment analysis".into());
    }
    let result = analysis::analyze_loan(&analysis_input)?;
    if args.entries {
        return entries_value(&result);
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_yearly(args: YearlyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan = plan_from_flags(args.template, &args.prepayments);
    let analysis_input = build_input(&args.loan, plan)?;
    let result = analysis::analyze_loan(&analysis_input)?;
    Ok(serde_json::to_value(result.result.yearly_summary)?)
}

fn build_input(
    args: &LoanArgs,
    plan: Option<PrepaymentPlan>,
) -> Result<LoanAnalysisInput, Box<dyn std::error::Error>> {
    let mut analysis_input: LoanAnalysisInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => LoanAnalysisInput {
            terms: terms_from_flags(args)?,
            prepayments: None,
            config: CalculatorConfig::default(),
        },
    };

    if plan.is_some() {
        analysis_input.prepayments = plan;
    }
    if let Some(rate) = args.inflation_rate {
        analysis_input.config = CalculatorConfig::with_inflation_rate_pct(rate)?;
    }
    Ok(analysis_input)
}

fn terms_from_flags(args: &LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let tenure_months = match (args.tenure_months, args.tenure_years) {
        (Some(months), _) => months,
        (None, Some(years)) => years
            .checked_mul(12)
            .ok_or("--tenure-years is too large")?,
        (None, None) => {
            return Err("--tenure-months or --tenure-years is required (or provide --input)".into())
        }
    };

    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args
            .rate
            .ok_or("--rate is required (or provide --input)")?,
        tenure_months,
        moratorium_months: args.moratorium_months,
        start_date: args
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
    })
}

fn plan_from_flags(
    template: Option<PrepaymentTemplate>,
    prepayments: &[PrepaymentSpec],
) -> Option<PrepaymentPlan> {
    match template {
        Some(template) => Some(PrepaymentPlan::Template(template)),
        None if !prepayments.is_empty() => Some(PrepaymentPlan::Explicit(prepayments.to_vec())),
        None => None,
    }
}

fn entries_value(
    output: &ComputationOutput<LoanAnalysisOutput>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = output
        .result
        .current
        .as_ref()
        .unwrap_or(&output.result.baseline);
    Ok(serde_json::to_value(snapshot.schedule.entries())?)
}

/// Parse a day-month-year date written with `-` or `/` separators.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let normalized = s.trim().replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%d-%m-%Y")
        .map_err(|e| format!("'{s}' is not a dd-mm-yyyy date: {e}"))
}

fn parse_prepayment(s: &str) -> Result<PrepaymentSpec, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [start, end, amount] = parts.as_slice() else {
        return Err(format!("'{s}' is not START:END:AMOUNT"));
    };
    Ok(PrepaymentSpec {
        start_date: parse_date(start)?,
        end_date: parse_date(end)?,
        amount: amount
            .trim()
            .parse()
            .map_err(|e| format!("invalid prepayment amount '{amount}': {e}"))?,
    })
}
