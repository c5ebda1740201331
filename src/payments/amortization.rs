use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::{AmortizationInput, RepaymentMethod};

/// largest financed amount the calculator accepts
pub const MAX_PRINCIPAL: Decimal = dec!(1_000_000_000_000_000);
/// largest annual rate in percent the calculator accepts
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(10_000);
/// longest term in months the calculator accepts
pub const MAX_TERM_MONTHS: u32 = 12_000;

/// one month of the repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    pub period_index: u32,
    pub payment_date: Option<NaiveDate>,
    /// interest plus principal paid in this period
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// full repayment schedule with aggregates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub method: RepaymentMethod,
    /// the level annuity payment; for differentiated schedules the first one
    pub monthly_payment: Money,
    pub first_payment_date: Option<NaiveDate>,
    pub periods: Vec<PaymentPeriod>,
    pub total_paid: Money,
    pub total_interest: Money,
}

impl AmortizationSchedule {
    pub(crate) fn from_periods(
        principal: Money,
        annual_rate: Rate,
        method: RepaymentMethod,
        monthly_payment: Money,
        first_payment_date: Option<NaiveDate>,
        periods: Vec<PaymentPeriod>,
    ) -> Self {
        let total_interest: Money = periods.iter().map(|p| p.interest_portion).sum();
        let total_paid: Money = periods
            .iter()
            .map(|p| p.interest_portion + p.principal_portion)
            .sum();

        Self {
            principal,
            annual_rate,
            term_months: periods.len() as u32,
            method,
            monthly_payment,
            first_payment_date,
            periods,
            total_paid,
            total_interest,
        }
    }

    /// get the period with a 1-based index
    pub fn get_period(&self, period_index: u32) -> Option<&PaymentPeriod> {
        period_index
            .checked_sub(1)
            .and_then(|i| self.periods.get(i as usize))
    }

    /// remaining balance after the given period, the principal before the first one
    pub fn balance_after(&self, period_index: u32) -> Money {
        self.get_period(period_index)
            .map(|p| p.remaining_balance)
            .unwrap_or(self.principal)
    }

    pub fn first_payment(&self) -> Money {
        self.periods.first().map(|p| p.payment).unwrap_or(Money::ZERO)
    }

    pub fn last_payment(&self) -> Money {
        self.periods.last().map(|p| p.payment).unwrap_or(Money::ZERO)
    }

    pub fn total_principal(&self) -> Money {
        self.periods.iter().map(|p| p.principal_portion).sum()
    }
}

/// amount repaid every period besides interest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Installment {
    /// fixed total payment, principal is what remains after interest
    Level(Money),
    /// fixed principal portion, interest on top
    EqualPrincipal(Money),
}

/// Compute the repayment schedule for `input`.
///
/// Pure and deterministic: the same input always yields the same schedule.
///
/// # Errors
///
/// `InvalidInput` when the principal is not positive, the term is zero or the
/// rate is negative, before any computation happens.
pub fn compute_schedule(input: &AmortizationInput) -> Result<AmortizationSchedule> {
    AmortizationCalculator::new(input.method).calculate(input)
}

/// amortization calculator
#[derive(Debug, Clone, Copy)]
pub struct AmortizationCalculator {
    method: RepaymentMethod,
}

impl AmortizationCalculator {
    pub fn new(method: RepaymentMethod) -> Self {
        Self { method }
    }

    pub fn method(&self) -> RepaymentMethod {
        self.method
    }

    /// calculate full schedule, ignoring `input.method` in favour of the calculator's
    pub fn calculate(&self, input: &AmortizationInput) -> Result<AmortizationSchedule> {
        validate_input(input)?;

        let monthly_rate = input.annual_rate.monthly_rate().as_decimal();
        let installment = self.installment(input.principal, monthly_rate, input.term_months);

        let periods = build_periods(
            input.principal,
            monthly_rate,
            installment,
            1,
            input.term_months,
            input.first_payment_date,
        );

        let monthly_payment = match installment {
            Installment::Level(payment) => payment,
            Installment::EqualPrincipal(_) => periods
                .first()
                .map(|p| p.payment)
                .unwrap_or(Money::ZERO),
        };

        Ok(AmortizationSchedule::from_periods(
            input.principal,
            input.annual_rate,
            self.method,
            monthly_payment,
            input.first_payment_date,
            periods,
        ))
    }

    pub(crate) fn installment(&self, balance: Money, monthly_rate: Decimal, months: u32) -> Installment {
        match self.method {
            RepaymentMethod::Annuity => Installment::Level(annuity_payment(balance, monthly_rate, months)),
            RepaymentMethod::Differentiated => {
                Installment::EqualPrincipal(balance / Decimal::from(months.max(1)))
            }
        }
    }
}

fn validate_input(input: &AmortizationInput) -> Result<()> {
    if !input.principal.is_positive() {
        return Err(CalculatorError::invalid(format!(
            "principal must be positive, got {}",
            input.principal
        )));
    }
    if input.principal.as_decimal() > MAX_PRINCIPAL {
        return Err(CalculatorError::invalid(format!(
            "principal must not exceed {MAX_PRINCIPAL}, got {}",
            input.principal
        )));
    }
    if input.term_months == 0 {
        return Err(CalculatorError::invalid("termMonths must be at least 1"));
    }
    if input.term_months > MAX_TERM_MONTHS {
        return Err(CalculatorError::invalid(format!(
            "termMonths must not exceed {MAX_TERM_MONTHS}, got {}",
            input.term_months
        )));
    }
    if input.annual_rate.is_negative() {
        return Err(CalculatorError::invalid(format!(
            "annualRatePercent must not be negative, got {}",
            input.annual_rate.as_percentage()
        )));
    }
    if input.annual_rate.as_percentage() > MAX_ANNUAL_RATE_PERCENT {
        return Err(CalculatorError::invalid(format!(
            "annualRatePercent must not exceed {MAX_ANNUAL_RATE_PERCENT}, got {}",
            input.annual_rate.as_percentage()
        )));
    }
    Ok(())
}

/// Level payment that repays `principal` over `months` periods.
///
/// `P * r * (1 + r)^n / ((1 + r)^n - 1)`, evaluated as `P * r / (1 - (1 + r)^-n)`
/// so long terms drive the discount factor toward zero instead of overflowing.
pub fn annuity_payment(principal: Money, monthly_rate: Decimal, months: u32) -> Money {
    if months == 0 {
        return principal;
    }

    if monthly_rate.is_zero() {
        return principal / Decimal::from(months);
    }

    let denominator = Decimal::ONE - discount_factor(monthly_rate, months);
    if denominator <= Decimal::ZERO {
        // rate too small to register at decimal precision
        return principal / Decimal::from(months);
    }

    Money::from_decimal(principal.as_decimal() * monthly_rate / denominator)
}

/// `(1 + r)^-n` by square-and-multiply
fn discount_factor(monthly_rate: Decimal, months: u32) -> Decimal {
    let mut base = Decimal::ONE / (Decimal::ONE + monthly_rate);
    let mut exponent = months;
    let mut result = Decimal::ONE;

    while exponent > 0 {
        if exponent & 1 == 1 {
            result *= base;
        }
        exponent >>= 1;
        if exponent > 0 {
            base *= base;
        }
    }

    result
}

/// Generate `count` periods starting at `first_index` from `balance`.
///
/// The last generated period repays whatever balance is left, so the schedule
/// always ends at exactly zero.
pub(crate) fn build_periods(
    balance: Money,
    monthly_rate: Decimal,
    installment: Installment,
    first_index: u32,
    count: u32,
    first_payment_date: Option<NaiveDate>,
) -> Vec<PaymentPeriod> {
    let mut periods = Vec::with_capacity(count as usize);
    let mut balance = balance;

    for offset in 0..count {
        let period_index = first_index + offset;
        let is_last = offset + 1 == count;

        let interest_portion = balance * monthly_rate;
        let principal_portion = if is_last {
            balance
        } else {
            match installment {
                Installment::Level(payment) => payment - interest_portion,
                Installment::EqualPrincipal(portion) => portion,
            }
        };

        let remaining_balance = (balance - principal_portion).max(Money::ZERO);

        periods.push(PaymentPeriod {
            period_index,
            payment_date: payment_date(first_payment_date, period_index),
            payment: principal_portion + interest_portion,
            interest_portion,
            principal_portion,
            remaining_balance,
        });

        balance = remaining_balance;
    }

    periods
}

/// date of a period, first payment date shifted by whole months (end of month clamped)
pub(crate) fn payment_date(first_payment_date: Option<NaiveDate>, period_index: u32) -> Option<NaiveDate> {
    first_payment_date
        .and_then(|date| date.checked_add_months(Months::new(period_index.saturating_sub(1))))
}
