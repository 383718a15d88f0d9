// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Ecosystem Configuration
//
// YAML configuration for the reasoning ecosystem:
// - LLM endpoint, model, timeouts and sampling parameters
// - Optional question template override file
// - Default state file location
// - Tunable generation/feedback policy
//
// Every field has a default, so an empty document is a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::EcosystemPolicy;
use crate::error::{ReasoningError, ReasoningResult};

pub const DEFAULT_STATE_FILE: &str = "reasoning_ecosystem_state.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    pub llm: LlmConfig,

    /// JSON file of additional question templates, merged at construction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_overrides: Option<PathBuf>,

    /// Where hosts persist ecosystem state between restarts.
    pub state_path: PathBuf,

    pub policy: EcosystemPolicy,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            template_overrides: None,
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            policy: EcosystemPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Set to false to skip the LLM entirely and always use templates.
    pub enabled: bool,

    /// Base URL of the Ollama-compatible service.
    pub endpoint: String,

    /// Preferred model; replaced by the first listed model if absent.
    pub model: String,

    /// Generation request timeout in seconds.
    pub timeout_secs: u64,

    /// Model-listing probe timeout in seconds.
    pub probe_timeout_secs: u64,

    pub temperature: f32,

    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 30,
            probe_timeout_secs: 5,
            temperature: 0.7,
            max_tokens: 512,
        }
    }
}

impl EcosystemConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ReasoningResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> ReasoningResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. SOCRATIC_CONFIG_PATH environment variable
    /// 2. ./socratic-config.yaml (working directory)
    /// 3. ~/.socratic/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SOCRATIC_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./socratic-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".socratic").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(explicit_path: Option<PathBuf>) -> anyhow::Result<Self> {
        if let Some(path) = explicit_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .with_context(|| format!("Failed to load config at {:?}", path))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", path);
                Self::from_yaml_file(&path)
                    .with_context(|| format!("Failed to load config at {:?}", path))?
            }
            None => {
                tracing::warn!("No configuration file found in standard locations. Using defaults.");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SOCRATIC_LLM_ENDPOINT") {
            tracing::info!("Environment override: SOCRATIC_LLM_ENDPOINT={}", val);
            self.llm.endpoint = val;
        }

        if let Ok(val) = std::env::var("SOCRATIC_LLM_MODEL") {
            tracing::info!("Environment override: SOCRATIC_LLM_MODEL={}", val);
            self.llm.model = val;
        }

        if let Ok(val) = std::env::var("SOCRATIC_LLM_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    tracing::info!("Environment override: SOCRATIC_LLM_TIMEOUT_SECS={}", secs);
                    self.llm.timeout_secs = secs;
                }
                _ => tracing::warn!(
                    "Invalid value for SOCRATIC_LLM_TIMEOUT_SECS: '{}'. Expected a positive integer. Ignoring.",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("SOCRATIC_LLM_ENABLED") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => self.llm.enabled = true,
                "false" | "0" | "no" | "off" => self.llm.enabled = false,
                _ => tracing::warn!(
                    "Invalid value for SOCRATIC_LLM_ENABLED: '{}'. Expected true/false. Ignoring.",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("SOCRATIC_STATE_PATH") {
            tracing::info!("Environment override: SOCRATIC_STATE_PATH={}", val);
            self.state_path = PathBuf::from(val);
        }
    }

    pub fn validate(&self) -> ReasoningResult<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ReasoningError::Config(format!(
                "llm.temperature must lie in [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.timeout_secs == 0 || self.llm.probe_timeout_secs == 0 {
            return Err(ReasoningError::Config(
                "llm timeouts must be at least one second".to_string(),
            ));
        }
        self.policy.validate().map_err(ReasoningError::Config)
    }
}
