use crate::adapters::dispatch::DEFAULT_OPERATION;
use crate::core::processor::{ProcessorSettings, DEFAULT_EMAIL_FROM};
use crate::utils::error::{FineError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub registry: RegistryConfig,
    pub dispatch: DispatchConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub endpoint: String,
    pub operation: String,
    pub email_from: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub concurrent_violations: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3602/v1.0/invoke/vehicleregistrationservice/method"
                .to_string(),
            timeout_seconds: 5,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3602/v1.0/bindings/sendmail".to_string(),
            operation: DEFAULT_OPERATION.to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            concurrent_violations: 4,
        }
    }
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FineError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REGISTRY_ENDPOINT})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FineError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn registry_timeout(&self) -> Duration {
        Duration::from_secs(self.registry.timeout_seconds)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.timeout_seconds)
    }

    pub fn processor_settings(&self) -> ProcessorSettings {
        ProcessorSettings {
            email_from: self.dispatch.email_from.clone(),
            lookup_timeout: Some(self.registry_timeout()),
            dispatch_timeout: Some(self.dispatch_timeout()),
        }
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_url("registry.endpoint", &self.registry.endpoint)?;
        validate_range(
            "registry.timeout_seconds",
            self.registry.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        validate_url("dispatch.endpoint", &self.dispatch.endpoint)?;
        validate_non_empty_string("dispatch.operation", &self.dispatch.operation)?;
        validate_email("dispatch.email_from", &self.dispatch.email_from)?;
        validate_range(
            "dispatch.timeout_seconds",
            self.dispatch.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        validate_positive_number(
            "processing.concurrent_violations",
            self.processing.concurrent_violations,
            1,
        )
    }
}
