pub mod config;
pub mod decimal;
pub mod errors;
pub mod mortgage;
pub mod payments;
pub mod serialization;
pub mod server;
pub mod types;

// re-export key types
pub use config::{CalculatorConfig, CalculatorLimits, DisplayConfig, MortgageProgram};
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, ConfigError, Result};
pub use mortgage::{calculate, compare, MortgageCalculation, MortgageRequest};
pub use payments::{
    annuity_payment, apply_early_repayments, compare_methods, compute_schedule, AmortizationCalculator,
    AmortizationSchedule, EarlyRepaymentResult, MethodComparison, PaymentPeriod, ScheduleSummary,
};
pub use serialization::{ComparisonView, PeriodView, ProgramView, ScheduleView, SummaryView};
pub use types::{AmortizationInput, EarlyRepayment, EarlyRepaymentStrategy, RepaymentMethod};
