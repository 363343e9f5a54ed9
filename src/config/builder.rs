use std::collections::BTreeMap;
use std::path::Path;

use toml::Table;

use super::env::EnvSource;
use super::file::FileSource;
use super::source::{merge_at_path, ConfigSource};
use super::ConfigError;
use crate::Value;

/// Flat parameters keyed by dotted path, e.g. `"server.port"`.
pub type ParameterMap = BTreeMap<String, Value>;

/// Builder for a [`ParameterMap`] layered from TOML files and environment
/// variables.
///
/// Sources are merged in registration order, later sources overriding
/// earlier ones. Nested tables merge recursively; other values are replaced.
/// The merged table is then flattened to dotted keys. Arrays are dropped.
///
/// ## Example
///
/// ```no_run
/// use prop_inject::{inject, injectable, Config};
///
/// #[derive(Default)]
/// struct Server {
///     port: i32,
/// }
/// injectable!(Server { port => "server.port" });
///
/// let params = Config::builder()
///     .with_file("config/default.toml", true)
///     .with_env("MYAPP", "__")
///     .with_file("config/local.toml", false)
///     .build()?;
///
/// let mut server = Server::default();
/// inject(&mut server, &params)?;
/// # Ok::<(), prop_inject::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Config {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file. A missing file fails the build only if `required`.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds environment variables named `<prefix><separator><path...>`.
    ///
    /// Path segments are lowercased; values are coerced to bool, integer,
    /// float, or string.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn build(self) -> Result<ParameterMap, ConfigError> {
        let mut merged = Table::new();
        for source in &self.sources {
            for entry in source.entries()? {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        let mut parameters = ParameterMap::new();
        flatten(&mut parameters, None, merged);
        Ok(parameters)
    }
}

fn flatten(out: &mut ParameterMap, prefix: Option<&str>, table: Table) {
    for (key, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            toml::Value::Table(nested) => flatten(out, Some(&key), nested),
            value => match Value::from_toml(value) {
                Some(value) => {
                    out.insert(key, value);
                }
                None => tracing::debug!(key, "skipping non-scalar parameter"),
            },
        }
    }
}
