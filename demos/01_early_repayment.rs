/// early repayment - compare shortening the term with lowering the payment
use realty_mortgage_rs::{
    apply_early_repayments, compute_schedule, AmortizationInput, EarlyRepayment, EarlyRepaymentStrategy,
    Money, Rate,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input = AmortizationInput::new(Money::from_major(6_000_000), Rate::from_percent(dec!(16)), 300);
    let schedule = compute_schedule(&input)?;

    println!("original payment {}, interest {}",
        schedule.monthly_payment.round_currency(2),
        schedule.total_interest.round_currency(2),
    );

    for strategy in [EarlyRepaymentStrategy::ReducePayment, EarlyRepaymentStrategy::ReduceTerm] {
        let repayment = EarlyRepayment {
            after_period: 24,
            amount: Money::from_major(1_000_000),
            strategy,
        };
        let result = apply_early_repayments(&schedule, &[repayment])?;

        println!("{strategy:?}: payment {}, term {} months, interest saved {}",
            result.schedule.monthly_payment.round_currency(2),
            result.schedule.term_months,
            result.interest_saved.round_currency(2),
        );
    }

    Ok(())
}
