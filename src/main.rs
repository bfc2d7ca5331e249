use std::env;
use anyhow::{bail, Result};

mod config;
mod errors;
mod generator;
mod initialization;
mod manager_model;
mod models;
mod predictor;
mod server;
mod validation;

#[tokio::main]
async fn main() -> Result<()> {
    let config = initialization::init().map_err(|e| anyhow::anyhow!("{}", e))?;

    let mode = env::args().nth(1).unwrap_or("serve".to_string());
    match mode.as_str() {
        "serve" => {
            let state = initialization::load_artifacts(&config);
            server::serve(state, config.server.port).await?;
        }
        "generate" => {
            generator::run(&config.generator)?;
        }
        other => bail!("unknown mode '{}', expected 'serve' or 'generate'", other),
    }

    Ok(())
}
