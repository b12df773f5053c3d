use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constant::{Const, DataError};
use crate::levels::LevelConfig;
use crate::utils::normalize_key;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub num_buckets: usize,
    pub top_n: usize,
    pub levels: LevelConfig,
    pub report_zones: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfigPatch {
    pub num_buckets: Option<usize>,
    pub top_n: Option<usize>,
    pub report_zones: Option<usize>,

    pub window_days: Option<usize>,
    pub min_touches: Option<u32>,
    pub max_levels: Option<usize>,
    pub grid_step: Option<f64>,
    pub candidate_limit: Option<usize>,
}

/// Defaults plus per-symbol overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisProfileConfig {
    #[serde(default)]
    pub default: AnalysisConfigPatch,
    #[serde(default)]
    pub symbol: HashMap<String, AnalysisConfigPatch>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            num_buckets: Const::DEFAULT_NUM_BUCKETS,
            top_n: Const::DEFAULT_TOP_N,
            levels: LevelConfig::default(),
            report_zones: Const::DEFAULT_REPORT_ZONES,
        }
    }
}

impl AnalysisConfig {
    pub fn apply_patch(mut self, patch: AnalysisConfigPatch) -> Self {
        if let Some(v) = patch.num_buckets {
            self.num_buckets = v;
        }
        if let Some(v) = patch.top_n {
            self.top_n = v;
        }
        if let Some(v) = patch.report_zones {
            self.report_zones = v;
        }

        if let Some(v) = patch.window_days {
            self.levels.window_days = v;
        }
        if let Some(v) = patch.min_touches {
            self.levels.min_touches = v;
        }
        if let Some(v) = patch.max_levels {
            self.levels.max_levels = v;
        }
        if let Some(v) = patch.grid_step {
            self.levels.grid_step = v;
        }
        if let Some(v) = patch.candidate_limit {
            self.levels.candidate_limit = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.num_buckets == 0 {
            return Err(DataError::InvalidArgument("num_buckets must be positive".to_string()));
        }
        if self.top_n == 0 {
            return Err(DataError::InvalidArgument("top_n must be positive".to_string()));
        }
        self.levels.validate()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let patch: AnalysisConfigPatch = serde_yaml::from_str(yaml)?;
        Ok(Self::default().apply_patch(patch))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

impl AnalysisProfileConfig {
    /// Accepts a `default` / `symbol` profile, or a flat patch that becomes
    /// the default for every symbol.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DataError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let is_profile = match value.as_mapping() {
            Some(map) => map.contains_key("default") || map.contains_key("symbol"),
            None => true,
        };
        if is_profile {
            return Ok(serde_yaml::from_value(value)?);
        }
        Ok(Self {
            default: serde_yaml::from_value(value)?,
            symbol: HashMap::new(),
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn resolve_for(&self, symbol: &str) -> AnalysisConfig {
        let mut config = AnalysisConfig::default().apply_patch(self.default.clone());
        let key = normalize_key(symbol);
        if let Some(patch) = self
            .symbol
            .iter()
            .find(|(k, _)| normalize_key(k) == key)
            .map(|(_, v)| v)
        {
            config = config.apply_patch(patch.clone());
        }
        config
    }
}
