use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::theme::Theme;

/// Record field the approximate matcher searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKey {
    Name,
    /// Each quality is matched on its own.
    Qualities,
    Group,
}

/// Options handed to the fuzzy matcher when the index arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherOptions {
    pub keys: Vec<SearchKey>,
    /// Highest accepted score; 0 is an exact match, 1 accepts anything.
    pub threshold: f64,
    /// How far from the start of a field a match may drift before the
    /// position alone costs a full point of score.
    pub distance: usize,
    pub max_pattern_len: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            keys: default_keys(),
            threshold: default_threshold(),
            distance: default_distance(),
            max_pattern_len: default_max_pattern_len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Index location, relative to the page or absolute (URL or file path).
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_distance")]
    pub distance: usize,

    #[serde(default = "default_keys")]
    pub keys: Vec<SearchKey>,

    #[serde(default = "default_max_pattern_len")]
    pub max_pattern_len: usize,

    #[serde(default)]
    pub theme: Theme,
}

fn default_index() -> String {
    "search.json".to_string()
}

fn default_threshold() -> f64 {
    0.4
}

fn default_distance() -> usize {
    100
}

fn default_keys() -> Vec<SearchKey> {
    vec![SearchKey::Name, SearchKey::Qualities, SearchKey::Group]
}

fn default_max_pattern_len() -> usize {
    32
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            threshold: default_threshold(),
            distance: default_distance(),
            keys: default_keys(),
            max_pattern_len: default_max_pattern_len(),
            theme: Theme::default(),
        }
    }
}

impl SearchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SearchConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Invalid(format!(
                "threshold must be in [0.0, 1.0], got {}",
                self.threshold
            )));
        }
        if self.distance == 0 {
            return Err(ConfigError::Invalid("distance must be > 0".to_string()));
        }
        if self.keys.is_empty() {
            return Err(ConfigError::Invalid(
                "keys must name at least one field".to_string(),
            ));
        }
        if self.max_pattern_len == 0 {
            return Err(ConfigError::Invalid(
                "max_pattern_len must be > 0".to_string(),
            ));
        }
        if self.index.trim().is_empty() {
            return Err(ConfigError::Invalid("index must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            keys: self.keys.clone(),
            threshold: self.threshold,
            distance: self.distance,
            max_pattern_len: self.max_pattern_len,
        }
    }
}
