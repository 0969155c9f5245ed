pub mod catalog;
pub mod product;

use markdown_engine_core::{Engine, EngineConfig};
use serde_json::Value;

use crate::input;

/// Build the engine from an optional configuration file.
pub fn load_engine(path: Option<&str>) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            let config: EngineConfig = input::file::read_config(path)?;
            tracing::info!(path, "loaded engine configuration");
            config
        }
        None => EngineConfig::default(),
    };
    Ok(Engine::new(config)?)
}

pub fn run_policies(engine: &Engine) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(engine.config())?)
}
