/// json schedule - the response the calculator page renders
use realty_mortgage_rs::{calculate, CalculatorConfig, MortgageRequest, ScheduleView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CalculatorConfig::default();

    let request: MortgageRequest = serde_json::from_str(
        r#"{
            "principal": 4500000,
            "downPayment": 900000,
            "termMonths": 12,
            "program": "family",
            "method": "differentiated",
            "firstPaymentDate": "2025-03-01"
        }"#,
    )?;

    let calculation = calculate(&request, &config)?;
    let view = ScheduleView::from_calculation(&calculation, config.display.decimals);

    println!("{}", view.to_json_pretty()?);

    Ok(())
}
