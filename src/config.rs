use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::payments::amortization::{MAX_ANNUAL_RATE_PERCENT, MAX_PRINCIPAL, MAX_TERM_MONTHS};

/// calculator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub limits: CalculatorLimits,
    pub display: DisplayConfig,
    pub programs: Vec<MortgageProgram>,
    /// program used when a request names none
    pub default_program: String,
}

/// bounds on accepted requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorLimits {
    /// largest property price
    pub max_principal: Decimal,
    pub max_term_months: u32,
    pub max_annual_rate_percent: Decimal,
    pub max_early_repayments: usize,
}

/// presentation rounding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// decimal places of amounts in responses, 0 rounds to whole roubles
    pub decimals: u32,
}

/// a mortgage offer the calculator page lets visitors pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageProgram {
    pub id: String,
    pub name: String,
    pub annual_rate_percent: Decimal,
    pub min_down_payment_percent: Decimal,
    pub max_term_months: u32,
}

impl Default for CalculatorLimits {
    fn default() -> Self {
        Self {
            max_principal: dec!(1_000_000_000),
            max_term_months: 600,
            max_annual_rate_percent: dec!(100),
            max_early_repayments: 120,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            limits: CalculatorLimits::default(),
            display: DisplayConfig::default(),
            programs: vec![
                MortgageProgram::standard(),
                MortgageProgram::family(),
                MortgageProgram::it_specialist(),
                MortgageProgram::secondary_market(),
            ],
            default_program: "standard".to_string(),
        }
    }
}

impl MortgageProgram {
    /// market-rate mortgage on a new building
    pub fn standard() -> Self {
        Self {
            id: "standard".to_string(),
            name: "Standard mortgage".to_string(),
            annual_rate_percent: dec!(19.5),
            min_down_payment_percent: dec!(20),
            max_term_months: 360,
        }
    }

    /// state-subsidised program for families with children
    pub fn family() -> Self {
        Self {
            id: "family".to_string(),
            name: "Family mortgage".to_string(),
            annual_rate_percent: dec!(6),
            min_down_payment_percent: dec!(20),
            max_term_months: 360,
        }
    }

    /// subsidised program for accredited IT employees
    pub fn it_specialist() -> Self {
        Self {
            id: "it".to_string(),
            name: "IT mortgage".to_string(),
            annual_rate_percent: dec!(6),
            min_down_payment_percent: dec!(20),
            max_term_months: 360,
        }
    }

    /// resale apartments, no subsidy
    pub fn secondary_market() -> Self {
        Self {
            id: "secondary".to_string(),
            name: "Secondary market".to_string(),
            annual_rate_percent: dec!(21),
            min_down_payment_percent: dec!(30),
            max_term_months: 360,
        }
    }
}

impl CalculatorConfig {
    /// parse and validate a json config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CalculatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// read, parse and validate a json config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn program(&self, id: &str) -> Option<&MortgageProgram> {
        self.programs.iter().find(|p| p.id == id)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;

        if limits.max_principal <= Decimal::ZERO || limits.max_principal > MAX_PRINCIPAL {
            return Err(invalid(format!(
                "limits.max_principal must be within (0, {MAX_PRINCIPAL}]"
            )));
        }
        if limits.max_term_months == 0 || limits.max_term_months > MAX_TERM_MONTHS {
            return Err(invalid(format!(
                "limits.max_term_months must be within 1..={MAX_TERM_MONTHS}"
            )));
        }
        if limits.max_annual_rate_percent < Decimal::ZERO
            || limits.max_annual_rate_percent > MAX_ANNUAL_RATE_PERCENT
        {
            return Err(invalid(format!(
                "limits.max_annual_rate_percent must be within [0, {MAX_ANNUAL_RATE_PERCENT}]"
            )));
        }
        if self.display.decimals > 10 {
            return Err(invalid("display.decimals must not exceed 10".to_string()));
        }

        for (i, program) in self.programs.iter().enumerate() {
            if program.id.is_empty() {
                return Err(invalid(format!("programs[{i}] has an empty id")));
            }
            if self.programs[..i].iter().any(|p| p.id == program.id) {
                return Err(invalid(format!("duplicate program id {}", program.id)));
            }
            if program.annual_rate_percent < Decimal::ZERO
                || program.annual_rate_percent > limits.max_annual_rate_percent
            {
                return Err(invalid(format!("program {} has an out of range rate", program.id)));
            }
            if program.min_down_payment_percent < Decimal::ZERO
                || program.min_down_payment_percent >= dec!(100)
            {
                return Err(invalid(format!(
                    "program {} minimum down payment must be within [0, 100)",
                    program.id
                )));
            }
            if program.max_term_months == 0 || program.max_term_months > limits.max_term_months {
                return Err(invalid(format!("program {} has an out of range term", program.id)));
            }
        }

        if self.program(&self.default_program).is_none() {
            return Err(invalid(format!(
                "default_program {} is not among the programs",
                self.default_program
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::InvalidConfiguration { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CalculatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.decimals, 2);
        assert_eq!(config.program("family").unwrap().annual_rate_percent, dec!(6));
        assert!(config.program("unknown").is_none());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = CalculatorConfig::from_json_str(r#"{ "display": { "decimals": 0 } }"#).unwrap();
        assert_eq!(config.display.decimals, 0);
        assert_eq!(config.limits, CalculatorLimits::default());
        assert_eq!(config.programs.len(), 4);
    }

    #[test]
    fn test_custom_programs() {
        let json = r#"{
            "programs": [
                { "id": "promo", "name": "Developer promo", "annual_rate_percent": 0.1,
                  "min_down_payment_percent": 50, "max_term_months": 120 }
            ],
            "default_program": "promo"
        }"#;
        let config = CalculatorConfig::from_json_str(json).unwrap();
        assert_eq!(config.program("promo").unwrap().annual_rate_percent, dec!(0.1));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = CalculatorConfig::default();
        config.default_program = "missing".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfiguration { .. })));

        let mut config = CalculatorConfig::default();
        config.programs.push(MortgageProgram::family());
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::default();
        config.limits.max_term_months = 0;
        assert!(config.validate().is_err());

        let mut config = CalculatorConfig::default();
        config.programs[0].max_term_months = 700;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = CalculatorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = CalculatorConfig::load("/nonexistent/mortgage.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
