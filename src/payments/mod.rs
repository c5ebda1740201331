pub mod amortization;
pub mod comparison;
pub mod prepayment;

pub use amortization::{
    annuity_payment, compute_schedule, AmortizationCalculator, AmortizationSchedule, PaymentPeriod,
};
pub use comparison::{compare_methods, MethodComparison, ScheduleSummary};
pub use prepayment::{apply_early_repayments, EarlyRepaymentResult};
