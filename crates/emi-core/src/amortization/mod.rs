pub mod emi;
pub mod schedule;
pub mod terms;
pub mod yearly;

pub use emi::{capitalize, compute_emi, compute_loan_emi};
pub use schedule::{build_baseline, generate_schedule, Schedule, ScheduleEntry};
pub use terms::{LoanTerms, MAX_LOAN_MONTHS};
pub use yearly::{summarize_by_year, YearSummary};
