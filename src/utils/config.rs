use serde::Deserialize;
use std::path::{Path, PathBuf};
use config::{Config as ConfigLib, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use crate::{
    core::crypto::ggh::GghParams,
    utils::error::{Result, EngineError},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub default_dimension: usize,
    pub max_dimension: usize,
    pub max_scale: i64,
    pub plaintext_range: i64,
    pub error_bound: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Config {
    /// Loads `config/default`, then `config/local`, then `LATTICE__*` env vars.
    pub fn new() -> Result<Self> {
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. LATTICE__SERVER__PORT=9000
            .add_source(
                Environment::with_prefix("LATTICE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads a single file on top of the defaults, without env overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::defaults()?
            .add_source(File::from(path.as_ref()))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let defaults = GghParams::default();
        let builder = ConfigLib::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.allowed_origins", Vec::<String>::new())?
            .set_default("engine.default_dimension", 2)?
            .set_default("engine.max_dimension", defaults.max_dimension as i64)?
            .set_default("engine.max_scale", defaults.max_scale)?
            .set_default("engine.plaintext_range", defaults.plaintext_range)?
            .set_default("engine.error_bound", defaults.error_bound)?
            .set_default("logging.level", "info")?
            .set_default("logging.file_prefix", "lattice-steps.log")?;
        Ok(builder)
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(EngineError::Config("Invalid port number".into()));
        }

        if self.engine.max_dimension < 2 {
            return Err(EngineError::Config("max_dimension must be at least 2".into()));
        }
        if self.engine.default_dimension < 2
            || self.engine.default_dimension > self.engine.max_dimension
        {
            return Err(EngineError::Config(format!(
                "default_dimension must be within 2..={}",
                self.engine.max_dimension
            )));
        }
        if self.engine.max_scale < 1 {
            return Err(EngineError::Config("max_scale must be greater than 0".into()));
        }
        if self.engine.plaintext_range < 1 {
            return Err(EngineError::Config("plaintext_range must be greater than 0".into()));
        }
        if self.engine.error_bound < 0 {
            return Err(EngineError::Config("error_bound must not be negative".into()));
        }

        if self.logging.level.trim().is_empty() {
            return Err(EngineError::Config("logging.level must be set".into()));
        }

        Ok(())
    }

    pub fn ggh_params(&self) -> GghParams {
        GghParams {
            max_dimension: self.engine.max_dimension,
            max_scale: self.engine.max_scale,
            plaintext_range: self.engine.plaintext_range,
            error_bound: self.engine.error_bound,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(error: ConfigError) -> Self {
        EngineError::Config(error.to_string())
    }
}
