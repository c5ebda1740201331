use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::info;

pub struct ServiceConfig {
    pub port: u16,
    /// json file with a `CalculatorConfig`, built-in defaults when unset
    pub calculator_config_path: Option<PathBuf>,
    pub cors_max_age_secs: u64,
}

impl ServiceConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// build from any key lookup, `load` uses the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: try_load(&lookup, "MORTGAGE_PORT", "8080")?,
            calculator_config_path: lookup("MORTGAGE_CONFIG")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            cors_max_age_secs: try_load(&lookup, "MORTGAGE_CORS_MAX_AGE_SECS", "3600")?,
        })
    }
}

fn try_load<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_max_age_secs, 3600);
        assert!(config.calculator_config_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("MORTGAGE_PORT", "9000"),
            ("MORTGAGE_CONFIG", "/etc/mortgage.json"),
            ("MORTGAGE_CORS_MAX_AGE_SECS", " 60 "),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_max_age_secs, 60);
        assert_eq!(config.calculator_config_path, Some(PathBuf::from("/etc/mortgage.json")));
    }

    #[test]
    fn test_invalid_port() {
        let result = ServiceConfig::from_lookup(lookup(&[("MORTGAGE_PORT", "not-a-port")]));
        assert!(result.is_err());
    }
}
