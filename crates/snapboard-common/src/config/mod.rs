//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BoardConfig, ConfigError, DatabaseConfig, Environment,
    SnowflakeConfig,
};
