/// serializable, rounded views of calculation results
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MortgageProgram;
use crate::decimal::Money;
use crate::mortgage::MortgageCalculation;
use crate::payments::{AmortizationSchedule, MethodComparison, PaymentPeriod, ScheduleSummary};
use crate::types::RepaymentMethod;

fn round(amount: Money, decimals: u32) -> Decimal {
    amount.round_currency(decimals).as_decimal()
}

/// schedule as returned by the calculate endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    pub method: RepaymentMethod,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none", default)]
    pub interest_saved: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub months_saved: Option<u32>,
    pub periods: Vec<PeriodView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodView {
    pub period_index: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_portion: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal_portion: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_balance: Decimal,
}

impl PeriodView {
    pub fn from_period(period: &PaymentPeriod, decimals: u32) -> Self {
        Self {
            period_index: period.period_index,
            payment_date: period.payment_date,
            payment: round(period.payment, decimals),
            interest_portion: round(period.interest_portion, decimals),
            principal_portion: round(period.principal_portion, decimals),
            remaining_balance: round(period.remaining_balance, decimals),
        }
    }
}

impl ScheduleView {
    pub fn from_schedule(schedule: &AmortizationSchedule, decimals: u32) -> Self {
        Self {
            monthly_payment: round(schedule.monthly_payment, decimals),
            total_paid: round(schedule.total_paid, decimals),
            total_interest: round(schedule.total_interest, decimals),
            principal: round(schedule.principal, decimals),
            annual_rate_percent: schedule.annual_rate.as_percentage().normalize(),
            term_months: schedule.term_months,
            method: schedule.method,
            interest_saved: None,
            months_saved: None,
            periods: schedule
                .periods
                .iter()
                .map(|p| PeriodView::from_period(p, decimals))
                .collect(),
        }
    }

    pub fn from_calculation(calculation: &MortgageCalculation, decimals: u32) -> Self {
        Self {
            interest_saved: calculation.interest_saved.map(|m| round(m, decimals)),
            months_saved: calculation.months_saved,
            ..Self::from_schedule(&calculation.schedule, decimals)
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub method: RepaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub first_payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub last_payment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Decimal,
}

impl SummaryView {
    pub fn from_summary(summary: &ScheduleSummary, decimals: u32) -> Self {
        Self {
            method: summary.method,
            first_payment: round(summary.first_payment, decimals),
            last_payment: round(summary.last_payment, decimals),
            total_paid: round(summary.total_paid, decimals),
            total_interest: round(summary.total_interest, decimals),
        }
    }
}

/// comparison as returned by the compare endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub annuity: SummaryView,
    pub differentiated: SummaryView,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_difference: Decimal,
}

impl ComparisonView {
    pub fn from_comparison(comparison: &MethodComparison, decimals: u32) -> Self {
        Self {
            annuity: SummaryView::from_summary(&comparison.annuity, decimals),
            differentiated: SummaryView::from_summary(&comparison.differentiated, decimals),
            interest_difference: round(comparison.interest_difference, decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramView {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_rate_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_down_payment_percent: Decimal,
    pub max_term_months: u32,
}

impl From<&MortgageProgram> for ProgramView {
    fn from(program: &MortgageProgram) -> Self {
        Self {
            id: program.id.clone(),
            name: program.name.clone(),
            annual_rate_percent: program.annual_rate_percent,
            min_down_payment_percent: program.min_down_payment_percent,
            max_term_months: program.max_term_months,
        }
    }
}
