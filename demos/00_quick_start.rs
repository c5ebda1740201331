/// quick start - monthly payment for a new-building apartment
use realty_mortgage_rs::{compute_schedule, AmortizationInput, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 10M apartment, 1M down, 12% for 20 years
    let input = AmortizationInput::new(Money::from_major(9_000_000), Rate::from_percent(dec!(12)), 240);
    let schedule = compute_schedule(&input)?;

    println!("monthly payment: {}", schedule.monthly_payment.round_currency(2));
    println!("total paid:      {}", schedule.total_paid.round_currency(2));
    println!("total interest:  {}", schedule.total_interest.round_currency(2));

    Ok(())
}
