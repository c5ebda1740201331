use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::{EarlyRepayment, EarlyRepaymentStrategy, RepaymentMethod};

use super::amortization::{build_periods, AmortizationCalculator, AmortizationSchedule, Installment};

/// balance left by decimal rounding that counts as repaid
const RESIDUE: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

/// schedule after early repayments, compared with the original
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyRepaymentResult {
    pub schedule: AmortizationSchedule,
    pub interest_saved: Money,
    pub months_saved: u32,
}

/// Apply lump-sum repayments to `original` in order of the period they follow.
///
/// Each lump sum is booked as extra principal of the period it follows; the
/// rest of the schedule is recomputed from the reduced balance.
pub fn apply_early_repayments(
    original: &AmortizationSchedule,
    repayments: &[EarlyRepayment],
) -> Result<EarlyRepaymentResult> {
    let mut ordered = repayments.to_vec();
    ordered.sort_by_key(|r| r.after_period);

    let mut schedule = original.clone();
    for repayment in &ordered {
        schedule = apply_repayment(&schedule, repayment)?;
    }

    Ok(EarlyRepaymentResult {
        interest_saved: (original.total_interest - schedule.total_interest).max(Money::ZERO),
        months_saved: original.term_months.saturating_sub(schedule.term_months),
        schedule,
    })
}

fn apply_repayment(schedule: &AmortizationSchedule, repayment: &EarlyRepayment) -> Result<AmortizationSchedule> {
    if !repayment.amount.is_positive() {
        return Err(CalculatorError::invalid(format!(
            "early repayment amount must be positive, got {}",
            repayment.amount
        )));
    }

    let term = schedule.term_months;
    if repayment.after_period == 0 || repayment.after_period >= term {
        return Err(CalculatorError::invalid(format!(
            "early repayment afterPeriod must be between 1 and {}, got {}",
            term.saturating_sub(1),
            repayment.after_period
        )));
    }

    let after = repayment.after_period as usize;
    let balance_before = schedule.balance_after(repayment.after_period);
    let amount = repayment.amount.min(balance_before);
    let balance = balance_before - amount;

    let mut periods = schedule.periods[..after].to_vec();
    if let Some(last) = periods.last_mut() {
        last.principal_portion += amount;
        last.payment += amount;
        last.remaining_balance = balance;
    }

    let mut monthly_payment = schedule.monthly_payment;

    if balance.as_decimal() > RESIDUE {
        let monthly_rate = schedule.annual_rate.monthly_rate().as_decimal();
        let remaining_months = term - repayment.after_period;

        let (installment, count) = match repayment.strategy {
            EarlyRepaymentStrategy::ReducePayment => {
                let calculator = AmortizationCalculator::new(schedule.method);
                (calculator.installment(balance, monthly_rate, remaining_months), remaining_months)
            }
            EarlyRepaymentStrategy::ReduceTerm => {
                let next = &schedule.periods[after];
                let installment = match schedule.method {
                    RepaymentMethod::Annuity => Installment::Level(schedule.monthly_payment),
                    RepaymentMethod::Differentiated => Installment::EqualPrincipal(next.principal_portion),
                };
                (installment, periods_to_repay(balance, monthly_rate, installment, remaining_months))
            }
        };

        if let Installment::Level(payment) = installment {
            monthly_payment = payment;
        }

        periods.extend(build_periods(
            balance,
            monthly_rate,
            installment,
            repayment.after_period + 1,
            count,
            schedule.first_payment_date,
        ));
    } else if let Some(last) = periods.last_mut() {
        last.principal_portion += balance;
        last.payment += balance;
        last.remaining_balance = Money::ZERO;
    }

    if schedule.method == RepaymentMethod::Differentiated {
        monthly_payment = periods.first().map(|p| p.payment).unwrap_or(monthly_payment);
    }

    Ok(AmortizationSchedule::from_periods(
        schedule.principal,
        schedule.annual_rate,
        schedule.method,
        monthly_payment,
        schedule.first_payment_date,
        periods,
    ))
}

/// number of periods the installment needs to clear `balance`, at most `limit`
fn periods_to_repay(balance: Money, monthly_rate: Decimal, installment: Installment, limit: u32) -> u32 {
    let months = match installment {
        Installment::EqualPrincipal(portion) => {
            if !portion.is_positive() {
                return limit;
            }
            (balance.as_decimal() / portion.as_decimal())
                .ceil()
                .to_u32()
                .unwrap_or(limit)
        }
        Installment::Level(payment) => {
            let mut remaining = balance;
            let mut months = 0;

            while remaining.as_decimal() > RESIDUE && months < limit {
                let principal = payment - remaining * monthly_rate;
                if !principal.is_positive() {
                    return limit;
                }
                remaining -= principal;
                months += 1;
            }

            months
        }
    };

    months.clamp(1, limit)
}
