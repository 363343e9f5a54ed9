//! Loading flat parameter maps from TOML files and environment variables.

mod builder;
mod env;
mod error;
mod file;
mod source;

pub use builder::{Config, ParameterMap};
pub use env::EnvSource;
pub use error::ConfigError;
pub use file::FileSource;
pub use source::{ConfigEntry, ConfigSource};
