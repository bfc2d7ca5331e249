use std::env;
use std::sync::Arc;
use log::{info, warn};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::{load_config, Config};
use crate::errors::InitError;
use crate::manager_model::ModelHandle;
use crate::server::AppState;

/// Loads configuration and initializes logging
///
/// The configuration path is taken from the SOLARCAST_CONFIG environment
/// variable, falling back to config.toml in the working directory.
pub fn init() -> Result<Config, InitError> {
    let config_path = env::var("SOLARCAST_CONFIG").unwrap_or("config.toml".to_string());
    let config = load_config(&config_path)?;

    init_logging(&config)?;
    info!("solarcast version: {}", env!("CARGO_PKG_VERSION"));

    Ok(config)
}

/// Loads the scaler and model artifacts into the shared service state.
///
/// A failed load is logged but does not abort startup. The service then
/// keeps answering health checks while every prediction request is turned
/// into a fixed server fault.
///
/// # Arguments
///
/// * 'config' - the loaded configuration
pub fn load_artifacts(config: &Config) -> Arc<AppState> {
    let model = match ModelHandle::load(&config.artifacts.scaler_file, &config.artifacts.model_file) {
        Ok(handle) => {
            info!("model artifacts loaded, {} estimators", handle.n_estimators());
            Some(handle)
        }
        Err(e) => {
            warn!("failed to load model artifacts, predictions will be unavailable: {}", e);
            None
        }
    };

    Arc::new(AppState { model })
}

/// Assembles the log4rs configuration from the general config section
fn init_logging(config: &Config) -> Result<(), InitError> {
    let pattern = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

    let mut builder = log4rs::Config::builder();
    let mut root = Root::builder();

    if config.general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(pattern)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build(&config.general.log_path)?;
    builder = builder.appender(Appender::builder().build("file", Box::new(file)));
    root = root.appender("file");

    let log_config = builder.build(root.build(config.general.log_level))?;
    log4rs::init_config(log_config)?;

    Ok(())
}
