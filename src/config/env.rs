use toml::Value;

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Parameters taken from environment variables.
///
/// `APP__DB__URL=x` with prefix `APP` and separator `__` yields the parameter
/// `db.url`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    fn entry(&self, key: &str, value: &str) -> Option<ConfigEntry> {
        let rest = key
            .strip_prefix(&self.prefix)?
            .strip_prefix(&self.separator)?;
        if rest.is_empty() {
            return None;
        }
        let path = rest
            .split(&self.separator)
            .map(str::to_lowercase)
            .collect();
        Some(ConfigEntry::at_path(path, coerce_value(value)))
    }
}

impl ConfigSource for EnvSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        Ok(std::env::vars()
            .filter_map(|(key, value)| self.entry(&key, &value))
            .collect())
    }
}

/// Picks the narrowest type for an environment string: bool, integer, float,
/// then string.
fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
