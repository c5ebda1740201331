use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

/// how the loan is repaid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepaymentMethod {
    /// equal payment amounts throughout term
    #[default]
    Annuity,
    /// equal principal portions, interest on remaining balance
    Differentiated,
}

/// what an early repayment shortens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EarlyRepaymentStrategy {
    /// keep the remaining term, lower the monthly payment
    #[default]
    ReducePayment,
    /// keep the monthly payment, finish earlier
    ReduceTerm,
}

/// loan parameters for a schedule calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationInput {
    /// financed amount, property price minus down payment
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub method: RepaymentMethod,
    pub first_payment_date: Option<NaiveDate>,
}

impl AmortizationInput {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
            method: RepaymentMethod::Annuity,
            first_payment_date: None,
        }
    }

    pub fn with_method(mut self, method: RepaymentMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }
}

/// unscheduled lump sum applied right after a regular payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyRepayment {
    /// regular period after which the lump sum is paid
    pub after_period: u32,
    pub amount: Money,
    #[serde(default)]
    pub strategy: EarlyRepaymentStrategy,
}
