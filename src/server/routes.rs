use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use crate::mortgage::{self, MortgageRequest};
use crate::serialization::{ComparisonView, ProgramView, ScheduleView};

use super::error::AppError;
use super::state::AppState;

fn parse(payload: Result<Json<MortgageRequest>, JsonRejection>) -> Result<MortgageRequest, AppError> {
    payload.map(|Json(request)| request).map_err(|rejection| {
        warn!("Rejected payload: {}", rejection.body_text());
        AppError::MalformedPayload(rejection.body_text())
    })
}

pub async fn calculate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MortgageRequest>, JsonRejection>,
) -> Result<Json<ScheduleView>, AppError> {
    let request = parse(payload)?;

    let calculation = mortgage::calculate(&request, &state.calculator).map_err(|e| {
        warn!("Invalid calculation request: {e}");
        e
    })?;

    info!(
        term_months = calculation.schedule.term_months,
        early_repayments = request.early_repayments.len(),
        "Calculated schedule"
    );

    Ok(Json(ScheduleView::from_calculation(
        &calculation,
        state.calculator.display.decimals,
    )))
}

pub async fn compare_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MortgageRequest>, JsonRejection>,
) -> Result<Json<ComparisonView>, AppError> {
    let request = parse(payload)?;

    let comparison = mortgage::compare(&request, &state.calculator).map_err(|e| {
        warn!("Invalid comparison request: {e}");
        e
    })?;

    Ok(Json(ComparisonView::from_comparison(
        &comparison,
        state.calculator.display.decimals,
    )))
}

pub async fn programs_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ProgramView>> {
    Json(state.calculator.programs.iter().map(ProgramView::from).collect())
}

pub async fn health_handler() -> &'static str {
    "ok"
}
