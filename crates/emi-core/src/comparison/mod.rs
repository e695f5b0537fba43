pub mod inflation;
pub mod savings;
pub mod snapshot;

pub use inflation::inflation_adjusted_loss;
pub use savings::{compare, SavingsReport, TenureReduction};
pub use snapshot::MetricsSnapshot;
