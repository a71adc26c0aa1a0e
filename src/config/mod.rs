pub mod cli;
pub mod toml_config;

pub use toml_config::ServiceConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_extensions, validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fine-collection")]
#[command(about = "Calculates speeding fines and notifies registered vehicle owners")]
pub struct CliConfig {
    #[arg(long, help = "Service configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the vehicle registry endpoint")]
    pub registry_endpoint: Option<String>,

    #[arg(long, help = "Override the output binding endpoint used to send e-mail")]
    pub dispatch_endpoint: Option<String>,

    #[arg(long, help = "Maximum number of violations processed at once")]
    pub concurrency: Option<usize>,

    #[arg(long, help = "Emit JSON logs instead of the compact console format")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(required = true, help = "Violation JSON files (one object or an array per file)")]
    pub violations: Vec<PathBuf>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// CLI values win over the configuration file.
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(endpoint) = &self.registry_endpoint {
            config.registry.endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.dispatch_endpoint {
            config.dispatch.endpoint = endpoint.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.processing.concurrent_violations = concurrency;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let files: Vec<String> = self
            .violations
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        validate_file_extensions("violations", &files, &["json"])?;

        if let Some(concurrency) = self.concurrency {
            validate_positive_number("concurrency", concurrency, 1)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = CliConfig::parse_from([
            "fine-collection",
            "--registry-endpoint",
            "http://registry:6002",
            "--concurrency",
            "8",
            "violations.json",
        ]);
        assert!(cli.validate().is_ok());

        let config = cli.service_config().unwrap();
        assert_eq!(config.registry.endpoint, "http://registry:6002");
        assert_eq!(config.processing.concurrent_violations, 8);
        assert_eq!(config.dispatch.endpoint, "http://localhost:3602/v1.0/bindings/sendmail");
    }

    #[test]
    fn test_rejects_non_json_input() {
        let cli = CliConfig::parse_from(["fine-collection", "violations.csv"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let cli = CliConfig::parse_from([
            "fine-collection",
            "--dispatch-endpoint",
            "smtp://mail",
            "violations.json",
        ]);
        assert!(cli.service_config().is_err());
    }
}
