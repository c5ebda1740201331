use std::sync::Arc;

use crate::config::CalculatorConfig;

/// read-only state shared by all handlers
pub struct AppState {
    pub calculator: CalculatorConfig,
}

impl AppState {
    pub fn new(calculator: CalculatorConfig) -> Arc<Self> {
        Arc::new(Self { calculator })
    }
}
