//! Purchase-level calculation: property price and down payment in, schedule out.
//!
//! A [`MortgageRequest`] is what the calculator page submits. It is checked
//! against the [`CalculatorConfig`] limits, and against the chosen program when
//! the visitor picked one, before being turned into an [`AmortizationInput`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CalculatorConfig, MortgageProgram};
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::payments::{
    apply_early_repayments, compare_methods, compute_schedule, AmortizationSchedule, MethodComparison,
};
use crate::types::{AmortizationInput, EarlyRepayment, RepaymentMethod};

/// calculator form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageRequest {
    /// property price, the down payment is subtracted from it
    pub principal: Money,
    #[serde(default)]
    pub down_payment: Money,
    /// falls back to the program rate when absent
    #[serde(default)]
    pub annual_rate_percent: Option<Decimal>,
    pub term_months: i64,
    #[serde(default)]
    pub method: RepaymentMethod,
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub early_repayments: Vec<EarlyRepayment>,
}

impl MortgageRequest {
    pub fn new(property_price: Money, down_payment: Money, annual_rate_percent: Decimal, term_months: i64) -> Self {
        Self {
            principal: property_price,
            down_payment,
            annual_rate_percent: Some(annual_rate_percent),
            term_months,
            method: RepaymentMethod::Annuity,
            first_payment_date: None,
            program: None,
            early_repayments: Vec::new(),
        }
    }

    /// validate against `config` and derive the loan to amortize
    pub fn to_input(&self, config: &CalculatorConfig) -> Result<AmortizationInput> {
        let limits = &config.limits;

        let program = match &self.program {
            Some(id) => Some(
                config
                    .program(id)
                    .ok_or_else(|| CalculatorError::invalid(format!("unknown program {id}")))?,
            ),
            None => None,
        };

        if !self.principal.is_positive() {
            return Err(CalculatorError::invalid(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.principal.as_decimal() > limits.max_principal {
            return Err(CalculatorError::invalid(format!(
                "principal must not exceed {}, got {}",
                limits.max_principal, self.principal
            )));
        }
        if self.down_payment.is_negative() {
            return Err(CalculatorError::invalid(format!(
                "downPayment must not be negative, got {}",
                self.down_payment
            )));
        }
        if self.down_payment >= self.principal {
            return Err(CalculatorError::invalid(format!(
                "downPayment {} must be below the principal {}",
                self.down_payment, self.principal
            )));
        }

        let term_months = self.term_months(limits.max_term_months, program)?;
        let annual_rate_percent = self.annual_rate_percent(config, program)?;

        if let Some(program) = program {
            let share = self.down_payment.percent_of(self.principal);
            if share < program.min_down_payment_percent {
                return Err(CalculatorError::invalid(format!(
                    "downPayment must be at least {}% of the principal for program {}, got {}%",
                    program.min_down_payment_percent,
                    program.id,
                    share.round_dp(2)
                )));
            }
        }

        if self.early_repayments.len() > limits.max_early_repayments {
            return Err(CalculatorError::invalid(format!(
                "at most {} early repayments are supported, got {}",
                limits.max_early_repayments,
                self.early_repayments.len()
            )));
        }

        let mut input = AmortizationInput::new(
            self.principal - self.down_payment,
            Rate::from_percent(annual_rate_percent),
            term_months,
        )
        .with_method(self.method);
        if let Some(date) = self.first_payment_date {
            input = input.with_first_payment_date(date);
        }

        Ok(input)
    }

    fn term_months(&self, max_term_months: u32, program: Option<&MortgageProgram>) -> Result<u32> {
        if self.term_months <= 0 {
            return Err(CalculatorError::invalid(format!(
                "termMonths must be at least 1, got {}",
                self.term_months
            )));
        }

        let max = program
            .map(|p| p.max_term_months.min(max_term_months))
            .unwrap_or(max_term_months);

        u32::try_from(self.term_months)
            .ok()
            .filter(|&term| term <= max)
            .ok_or_else(|| {
                CalculatorError::invalid(format!(
                    "termMonths must not exceed {max}, got {}",
                    self.term_months
                ))
            })
    }

    fn annual_rate_percent(&self, config: &CalculatorConfig, program: Option<&MortgageProgram>) -> Result<Decimal> {
        let rate = match self.annual_rate_percent {
            Some(rate) => rate,
            None => program
                .or_else(|| config.program(&config.default_program))
                .map(|p| p.annual_rate_percent)
                .ok_or_else(|| CalculatorError::invalid("annualRatePercent is required"))?,
        };

        if rate < Decimal::ZERO {
            return Err(CalculatorError::invalid(format!(
                "annualRatePercent must not be negative, got {rate}"
            )));
        }
        if rate > config.limits.max_annual_rate_percent {
            return Err(CalculatorError::invalid(format!(
                "annualRatePercent must not exceed {}, got {rate}",
                config.limits.max_annual_rate_percent
            )));
        }

        Ok(rate)
    }
}

/// outcome of a calculator request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageCalculation {
    pub property_price: Money,
    pub down_payment: Money,
    pub schedule: AmortizationSchedule,
    /// set when early repayments were applied
    pub interest_saved: Option<Money>,
    pub months_saved: Option<u32>,
}

/// compute the schedule for a request, early repayments included
pub fn calculate(request: &MortgageRequest, config: &CalculatorConfig) -> Result<MortgageCalculation> {
    let input = request.to_input(config)?;
    let schedule = compute_schedule(&input)?;

    debug!(
        principal = %input.principal,
        rate = %input.annual_rate,
        term_months = input.term_months,
        method = ?input.method,
        monthly_payment = %schedule.monthly_payment,
        "computed schedule"
    );

    if request.early_repayments.is_empty() {
        return Ok(MortgageCalculation {
            property_price: request.principal,
            down_payment: request.down_payment,
            schedule,
            interest_saved: None,
            months_saved: None,
        });
    }

    let result = apply_early_repayments(&schedule, &request.early_repayments)?;

    debug!(
        repayments = request.early_repayments.len(),
        interest_saved = %result.interest_saved,
        months_saved = result.months_saved,
        "applied early repayments"
    );

    Ok(MortgageCalculation {
        property_price: request.principal,
        down_payment: request.down_payment,
        schedule: result.schedule,
        interest_saved: Some(result.interest_saved),
        months_saved: Some(result.months_saved),
    })
}

/// annuity against differentiated for the request's loan
pub fn compare(request: &MortgageRequest, config: &CalculatorConfig) -> Result<MethodComparison> {
    let input = request.to_input(config)?;
    compare_methods(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EarlyRepaymentStrategy;
    use rust_decimal_macros::dec;

    fn request(price: i64, down: i64, rate: Decimal, term: i64) -> MortgageRequest {
        MortgageRequest::new(Money::from_major(price), Money::from_major(down), rate, term)
    }

    #[test]
    fn test_down_payment_is_subtracted() {
        let config = CalculatorConfig::default();
        let input = request(10_000_000, 1_000_000, dec!(12), 240).to_input(&config).unwrap();

        assert_eq!(input.principal, Money::from_major(9_000_000));
        assert_eq!(input.annual_rate, Rate::from_percent(dec!(12)));
        assert_eq!(input.term_months, 240);
    }

    #[test]
    fn test_calculate_without_repayments() {
        let config = CalculatorConfig::default();
        let calculation = calculate(&request(10_000_000, 1_000_000, dec!(12), 240), &config).unwrap();

        assert_eq!(calculation.property_price, Money::from_major(10_000_000));
        assert_eq!(calculation.schedule.principal, Money::from_major(9_000_000));
        assert_eq!(
            calculation.schedule.monthly_payment.round_currency(2),
            Money::from_str_exact("99097.75").unwrap()
        );
        assert!(calculation.interest_saved.is_none());
        assert!(calculation.months_saved.is_none());
    }

    #[test]
    fn test_calculate_with_repayments() {
        let config = CalculatorConfig::default();
        let mut req = request(5_000_000, 1_000_000, dec!(10), 120);
        req.early_repayments.push(EarlyRepayment {
            after_period: 12,
            amount: Money::from_major(500_000),
            strategy: EarlyRepaymentStrategy::ReduceTerm,
        });

        let calculation = calculate(&req, &config).unwrap();
        assert!(calculation.interest_saved.unwrap().is_positive());
        assert!(calculation.months_saved.unwrap() > 0);
        assert!(calculation.schedule.term_months < 120);
    }

    #[test]
    fn test_program_supplies_rate_and_minimum_down_payment() {
        let config = CalculatorConfig::default();

        let mut req = request(8_000_000, 2_000_000, Decimal::ZERO, 240);
        req.annual_rate_percent = None;
        req.program = Some("family".to_string());
        let input = req.to_input(&config).unwrap();
        assert_eq!(input.annual_rate, Rate::from_percent(dec!(6)));

        // 10% is below the family program's 20%
        req.down_payment = Money::from_major(800_000);
        let err = req.to_input(&config).unwrap_err();
        assert!(err.details().contains("at least 20%"));

        req.program = Some("unknown".to_string());
        assert!(req.to_input(&config).is_err());
    }

    #[test]
    fn test_default_program_rate_without_minimums() {
        let config = CalculatorConfig::default();
        let mut req = request(3_000_000, 0, Decimal::ZERO, 120);
        req.annual_rate_percent = None;

        let input = req.to_input(&config).unwrap();
        assert_eq!(input.annual_rate, Rate::from_percent(dec!(19.5)));
        assert_eq!(input.principal, Money::from_major(3_000_000));
    }

    #[test]
    fn test_request_validation() {
        let config = CalculatorConfig::default();

        assert!(request(0, 0, dec!(10), 120).to_input(&config).is_err());
        assert!(request(1_000_000, -1, dec!(10), 120).to_input(&config).is_err());
        assert!(request(1_000_000, 1_000_000, dec!(10), 120).to_input(&config).is_err());
        assert!(request(1_000_000, 0, dec!(10), 0).to_input(&config).is_err());
        assert!(request(1_000_000, 0, dec!(10), -12).to_input(&config).is_err());
        assert!(request(1_000_000, 0, dec!(10), 601).to_input(&config).is_err());
        assert!(request(1_000_000, 0, dec!(-1), 120).to_input(&config).is_err());
        assert!(request(1_000_000, 0, dec!(101), 120).to_input(&config).is_err());
        assert!(request(2_000_000_000, 0, dec!(10), 120).to_input(&config).is_err());

        let mut capped = request(1_000_000, 200_000, dec!(10), 400);
        capped.program = Some("standard".to_string());
        let err = capped.to_input(&config).unwrap_err();
        assert!(err.details().contains("must not exceed 360"));
    }

    #[test]
    fn test_compare_uses_request_loan() {
        let config = CalculatorConfig::default();
        let comparison = compare(&request(7_000_000, 2_000_000, dec!(15), 180), &config).unwrap();
        assert!(comparison.interest_difference.is_positive());
        let repaid = comparison.annuity.total_paid - comparison.annuity.total_interest;
        assert!((repaid - Money::from_major(5_000_000)).abs() < Money::from_minor(1, 2));
    }

    #[test]
    fn test_request_json_defaults() {
        let req: MortgageRequest = serde_json::from_str(
            r#"{ "principal": 9000000, "annualRatePercent": 12, "termMonths": 240 }"#,
        )
        .unwrap();

        assert_eq!(req.down_payment, Money::ZERO);
        assert_eq!(req.method, RepaymentMethod::Annuity);
        assert!(req.early_repayments.is_empty());
        assert_eq!(req.annual_rate_percent, Some(dec!(12)));
    }
}
