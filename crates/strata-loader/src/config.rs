use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, LoaderResult};

/// Loader tuning, read from a TOML file. Every field has a default, so a
/// partial file only overrides what it names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Wall-clock budget of synchronous work before yielding to the runtime.
    pub yield_budget_ms: u64,
    /// A resume slower than this after a yield is reported at debug level.
    pub yield_overrun_ms: u64,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
    /// File holding a persisted access token.
    pub token_file: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            yield_budget_ms: 30,
            yield_overrun_ms: 100,
            event_capacity: 1024,
            token_file: None,
        }
    }
}

impl LoaderConfig {
    pub fn from_toml_str(text: &str) -> LoaderResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| LoaderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> LoaderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> LoaderResult<String> {
        toml::to_string_pretty(self).map_err(|e| LoaderError::Config(e.to_string()))
    }

    pub fn yield_budget(&self) -> Duration {
        Duration::from_millis(self.yield_budget_ms)
    }

    pub fn yield_overrun(&self) -> Duration {
        Duration::from_millis(self.yield_overrun_ms)
    }

    fn validate(&self) -> LoaderResult<()> {
        if self.event_capacity == 0 {
            return Err(LoaderError::Config("event_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = LoaderConfig::default();
        assert_eq!(c.yield_budget(), Duration::from_millis(30));
        assert_eq!(c.yield_overrun(), Duration::from_millis(100));
        assert_eq!(c.event_capacity, 1024);
        assert!(c.token_file.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = LoaderConfig::from_toml_str("yield_budget_ms = 5\n").unwrap();
        assert_eq!(c.yield_budget_ms, 5);
        assert_eq!(c.yield_overrun_ms, 100);
        assert_eq!(c.event_capacity, 1024);
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = LoaderConfig::from_toml_str("event_capacity = 0").unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            LoaderConfig::from_toml_str("yield_budget_ms = \"soon\""),
            Err(LoaderError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "token_file = \"/tmp/strata-token\"").unwrap();
        let c = LoaderConfig::load(file.path()).unwrap();
        assert_eq!(c.token_file, Some(PathBuf::from("/tmp/strata-token")));
    }

    #[test]
    fn toml_roundtrip() {
        let c = LoaderConfig {
            yield_budget_ms: 12,
            token_file: Some("token".into()),
            ..Default::default()
        };
        let text = c.to_toml_string().unwrap();
        assert_eq!(LoaderConfig::from_toml_str(&text).unwrap(), c);
    }
}
