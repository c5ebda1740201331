use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{AmortizationInput, RepaymentMethod};

use super::amortization::{AmortizationCalculator, AmortizationSchedule};

/// headline numbers of one schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub method: RepaymentMethod,
    pub first_payment: Money,
    pub last_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &AmortizationSchedule) -> Self {
        Self {
            method: schedule.method,
            first_payment: schedule.first_payment(),
            last_payment: schedule.last_payment(),
            total_paid: schedule.total_paid,
            total_interest: schedule.total_interest,
        }
    }
}

/// annuity and differentiated schedules for the same loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub annuity: ScheduleSummary,
    pub differentiated: ScheduleSummary,
    /// how much more interest the annuity costs
    pub interest_difference: Money,
}

/// compare both repayment methods, `input.method` is ignored
pub fn compare_methods(input: &AmortizationInput) -> Result<MethodComparison> {
    let annuity = AmortizationCalculator::new(RepaymentMethod::Annuity).calculate(input)?;
    let differentiated = AmortizationCalculator::new(RepaymentMethod::Differentiated).calculate(input)?;

    Ok(MethodComparison {
        interest_difference: annuity.total_interest - differentiated.total_interest,
        annuity: ScheduleSummary::from_schedule(&annuity),
        differentiated: ScheduleSummary::from_schedule(&differentiated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_costs_more_interest() {
        let input = AmortizationInput::new(Money::from_major(6_000_000), Rate::from_percent(dec!(11)), 240);
        let comparison = compare_methods(&input).unwrap();

        assert_eq!(comparison.annuity.method, RepaymentMethod::Annuity);
        assert_eq!(comparison.differentiated.method, RepaymentMethod::Differentiated);
        assert!(comparison.interest_difference.is_positive());

        // differentiated starts higher and ends lower
        assert!(comparison.differentiated.first_payment > comparison.annuity.first_payment);
        assert!(comparison.differentiated.last_payment < comparison.annuity.last_payment);
    }

    #[test]
    fn test_methods_match_without_interest() {
        let input = AmortizationInput::new(Money::from_major(1_000_000), Rate::from_percent(Decimal::ZERO), 10);
        let comparison = compare_methods(&input).unwrap();

        assert_eq!(comparison.interest_difference, Money::ZERO);
        assert_eq!(comparison.annuity.total_paid, comparison.differentiated.total_paid);
        assert_eq!(comparison.annuity.first_payment, Money::from_major(100_000));
    }

    #[test]
    fn test_invalid_input_propagates() {
        let input = AmortizationInput::new(Money::from_major(1_000_000), Rate::from_percent(dec!(10)), 0);
        assert!(compare_methods(&input).is_err());
    }
}
