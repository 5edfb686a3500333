use crate::engine::Strategy;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub game_api_url: String,
    pub access_token: Option<String>,
    pub poll_interval_ms: u64,
    pub survival_time_secs: f64,
    pub elemental_weights: Vec<f64>,
    pub elemental_specializations: usize,
    pub click_frequency: f64,
    pub buy_abilities: bool,
    pub rng_seed: Option<u64>,
    /// Score and log only; never submit purchases.
    pub dry_run: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let game_api_url = env_map
            .get("GAME_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("GAME_API_URL".to_string()))?;

        let access_token = env_map.get("ACCESS_TOKEN").cloned();

        let poll_interval_ms = parse_number(&env_map, "POLL_INTERVAL_MS", 5000u64)?;
        let survival_time_secs = parse_number(&env_map, "SURVIVAL_TIME_SECS", 30.0f64)?;
        let click_frequency = parse_number(&env_map, "CLICK_FREQUENCY", 20.0f64)?;

        let elemental_weights = parse_weights(&env_map)?;

        let elemental_specializations =
            parse_number(&env_map, "ELEMENTAL_SPECIALIZATIONS", 1usize)?;
        if elemental_specializations < 1 || elemental_specializations > elemental_weights.len() {
            return Err(ConfigError::InvalidValue(
                "ELEMENTAL_SPECIALIZATIONS".to_string(),
                format!("must be between 1 and {}", elemental_weights.len()),
            ));
        }

        let buy_abilities = parse_bool(&env_map, "BUY_ABILITIES", false)?;
        let dry_run = parse_bool(&env_map, "DRY_RUN", false)?;

        let rng_seed = match env_map.get("RNG_SEED") {
            Some(s) => Some(s.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("RNG_SEED".to_string(), "must be a valid u64".to_string())
            })?),
            None => None,
        };

        Ok(Config {
            port,
            game_api_url,
            access_token,
            poll_interval_ms,
            survival_time_secs,
            elemental_weights,
            elemental_specializations,
            click_frequency,
            buy_abilities,
            rng_seed,
            dry_run,
        })
    }

    /// Engine strategy knobs carried by this configuration.
    pub fn strategy(&self) -> Strategy {
        Strategy {
            survival_time_secs: self.survival_time_secs,
            elemental_weights: self.elemental_weights.clone(),
            elemental_specializations: self.elemental_specializations,
            clicks_per_second: self.click_frequency,
            buy_abilities: self.buy_abilities,
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(s) => s.parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("could not parse {:?}", s))
        }),
        None => Ok(default),
    }
}

fn parse_bool(
    env_map: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match env_map.get(key).map(|s| s.as_str()) {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be true or false, got {}", other),
        )),
    }
}

fn parse_weights(env_map: &HashMap<String, String>) -> Result<Vec<f64>, ConfigError> {
    match env_map.get("ELEMENTAL_WEIGHTS") {
        None => Ok(vec![0.4, 0.3, 0.2, 0.1]),
        Some(s) => {
            let weights = s
                .split(',')
                .map(|part| part.trim().parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|_| {
                    ConfigError::InvalidValue(
                        "ELEMENTAL_WEIGHTS".to_string(),
                        "must be a comma-separated list of numbers".to_string(),
                    )
                })?;
            if weights.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "ELEMENTAL_WEIGHTS".to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Ok(weights)
        }
    }
}
