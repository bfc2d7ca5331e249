use std::fmt;
use std::fmt::Formatter;
use thiserror::Error;

/// Client-fault errors raised while turning an untyped request body into
/// a FeatureVector. Each variant maps to HTTP 400.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotJson,
    MissingFields(Vec<String>),
    TypeConversion(String),
    Range { field: &'static str, min: f64, max: f64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotJson => write!(f, "Request must be JSON"),
            ValidationError::MissingFields(names) =>
                write!(f, "Missing required features: {}", names.join(", ")),
            ValidationError::TypeConversion(detail) =>
                write!(f, "Invalid feature values: {}", detail),
            ValidationError::Range { field, min, max } => {
                let (label, unit) = match *field {
                    "temperature" => ("Temperature", "°C"),
                    "cloud_cover" => ("Cloud cover", "%"),
                    "humidity" => ("Humidity", "%"),
                    "hour" => ("Hour", ""),
                    "month" => ("Month", ""),
                    other => (other, ""),
                };
                write!(f, "{} must be between {}{} and {}{}", label, min, unit, max, unit)
            }
        }
    }
}

/// Errors out of the full validate-scale-score pipeline. Validation keeps
/// its classification so the server can answer 400 instead of 500.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    Validation(ValidationError),
    ModelUnavailable,
    Failed(String),
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::Validation(e) => write!(f, "{}", e),
            PredictError::ModelUnavailable => write!(f, "Model artifacts are not loaded"),
            PredictError::Failed(detail) => write!(f, "Prediction failed: {}", detail),
        }
    }
}

impl From<ValidationError> for PredictError {
    fn from(e: ValidationError) -> Self {
        PredictError::Validation(e)
    }
}

#[derive(Error, Debug)]
#[error("error loading configuration: {0}")]
pub struct ConfigError(pub String);
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> ConfigError {
        ConfigError(format!("config file error: {}", e))
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> ConfigError {
        ConfigError(format!("config document error: {}", e))
    }
}
impl From<String> for ConfigError {
    fn from(s: String) -> ConfigError {
        ConfigError(s)
    }
}

#[derive(Error, Debug)]
#[error("error generating dataset: {0}")]
pub struct GeneratorError(pub String);
impl From<std::io::Error> for GeneratorError {
    fn from(e: std::io::Error) -> GeneratorError {
        GeneratorError(format!("dataset file error: {}", e))
    }
}
impl From<csv::Error> for GeneratorError {
    fn from(e: csv::Error) -> GeneratorError {
        GeneratorError(format!("csv write error: {}", e))
    }
}

pub struct InitError(pub String);

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "InitError: {}", self.0)
    }
}
impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError(e.to_string())
    }
}
impl From<std::io::Error> for InitError {
    fn from(e: std::io::Error) -> Self {
        InitError(e.to_string())
    }
}
impl From<log::SetLoggerError> for InitError {
    fn from(e: log::SetLoggerError) -> Self { InitError(e.to_string()) }
}
impl From<log4rs::config::runtime::ConfigErrors> for InitError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self { InitError(e.to_string()) }
}
