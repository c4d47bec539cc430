use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use thiserror::Error;

use crate::core_types::CourseId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    /// "never", "hourly" or "daily"
    pub rotation: String,
    #[serde(default)]
    pub school: SchoolConfig,
}

/// Knobs for the school components
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SchoolConfig {
    /// Seat limit per course. Enrollment requests for any other course
    /// are rejected when the queue is processed.
    pub capacities: BTreeMap<CourseId, usize>,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        let capacities = [("CS101", 2), ("MATH201", 2), ("PHY301", 1)]
            .into_iter()
            .map(|(course, cap)| (course.to_string(), cap))
            .collect();
        Self { capacities }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "school_admin.log".to_string(),
            use_json: false,
            rotation: "never".to_string(),
            school: SchoolConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
