use crate::error::ConfigError;
use crate::prompt::QUALITY_SUFFIX;
use crate::types::DevicePreference;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Denoising steps per generation.
pub const DEFAULT_INFERENCE_STEPS: u32 = 20;

/// Output rate of the AudioLDM vocoder.
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

pub const DEFAULT_MODEL_ID: &str = "cvssp/audioldm-s-full-v2";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_repo_id")]
    pub repo_id: String,

    #[serde(default)]
    pub device: DevicePreference,

    #[serde(default = "default_inference_steps")]
    pub num_inference_steps: u32,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_quality_suffix")]
    pub quality_suffix: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            repo_id: default_repo_id(),
            device: DevicePreference::default(),
            num_inference_steps: default_inference_steps(),
            sample_rate: default_sample_rate(),
            quality_suffix: default_quality_suffix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_engine_name")]
    pub name: String,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            remote: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LimitsConfig {
    #[serde(default)]
    pub max_prompt_chars: Option<usize>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7860
}

fn default_repo_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_inference_steps() -> u32 {
    DEFAULT_INFERENCE_STEPS
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_quality_suffix() -> String {
    QUALITY_SUFFIX.to_string()
}

fn default_engine_name() -> String {
    "remote".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
/// Comment lines are left as written.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }
        let mut result = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            let val = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            result = result.replace(&cap[0], &val);
        }
        lines.push(result);
    }

    Ok(lines.join("\n"))
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), engine = %config.engine.name, "config loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.repo_id.trim().is_empty() {
            return Err(ConfigError::Invalid("model.repo_id is empty".to_string()));
        }
        if self.model.num_inference_steps == 0 {
            return Err(ConfigError::Invalid(
                "model.num_inference_steps must be at least 1".to_string(),
            ));
        }
        if self.model.sample_rate == 0 {
            return Err(ConfigError::Invalid(
                "model.sample_rate must be non-zero".to_string(),
            ));
        }
        if self.limits.max_prompt_chars == Some(0) {
            return Err(ConfigError::Invalid(
                "limits.max_prompt_chars must be at least 1 when set".to_string(),
            ));
        }
        if let Some(ref remote) = self.engine.remote {
            if remote.timeout_secs == Some(0) {
                return Err(ConfigError::Invalid(
                    "engine.remote.timeout_secs must be at least 1 when set".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Engine-specific settings merged with the model section, as handed to
    /// `SfxEngine::initialize`.
    pub fn engine_settings(&self) -> Result<toml::Value, ConfigError> {
        let mut table = match self.engine.name.as_str() {
            "remote" => match self.engine.remote {
                Some(ref remote) => toml::Value::try_from(remote)
                    .map_err(|e| ConfigError::Invalid(format!("engine.remote: {e}")))?,
                None => toml::Value::Table(Default::default()),
            },
            _ => toml::Value::Table(Default::default()),
        };

        if let Some(t) = table.as_table_mut() {
            t.insert(
                "model_id".to_string(),
                toml::Value::String(self.model.repo_id.clone()),
            );
            t.insert(
                "device".to_string(),
                toml::Value::String(self.model.device.as_str().to_string()),
            );
            t.insert(
                "sample_rate".to_string(),
                toml::Value::Integer(i64::from(self.model.sample_rate)),
            );
        }
        Ok(table)
    }
}
