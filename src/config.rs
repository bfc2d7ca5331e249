use std::fs;
use chrono::NaiveDate;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize, Clone)]
pub struct ServerParameters {
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct ArtifactFiles {
    pub scaler_file: String,
    pub model_file: String,
}

#[derive(Deserialize, Clone)]
pub struct GeneratorParameters {
    pub seed: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub output_file: String,
}

#[derive(Deserialize, Clone)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Clone)]
pub struct Config {
    pub server: ServerParameters,
    pub artifacts: ArtifactFiles,
    pub generator: GeneratorParameters,
    pub general: General,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {

    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    if config.generator.end_date < config.generator.start_date {
        return Err(ConfigError::from("generator end_date is before start_date".to_string()));
    }

    Ok(config)
}
