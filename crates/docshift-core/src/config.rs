//! Configuration module
//!
//! This module provides configuration structures for the conversion server:
//! listener and CORS settings, directory layout, upload limits and the
//! retention delays applied to temporary and generated files.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_UPLOAD_SIZE_MB: usize = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const UPLOAD_RETENTION_SECS: u64 = 1;
const OUTPUT_RETENTION_SECS: u64 = 120;
const ORPHAN_SWEEP_INTERVAL_SECS: u64 = 600;
const ORPHAN_MAX_AGE_SECS: u64 = 3600;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Listener-level settings shared by every route
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub request_timeout: Duration,
    pub http_concurrency_limit: usize,
    /// `compact` or `json`
    pub log_format: String,
}

/// Conversion pipeline configuration
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    pub base: BaseConfig,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    /// How long an uploaded PDF survives after its request finished.
    pub upload_retention: Duration,
    /// How long a generated document survives after a download.
    pub output_retention: Duration,
    /// Zero disables the orphan sweeper.
    pub orphan_sweep_interval: Duration,
    pub orphan_max_age: Duration,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            log_format: "compact".to_string(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            static_dir: PathBuf::from("public"),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            allowed_content_types: vec!["application/pdf".to_string()],
            upload_retention: Duration::from_secs(UPLOAD_RETENTION_SECS),
            output_retention: Duration::from_secs(OUTPUT_RETENTION_SECS),
            orphan_sweep_interval: Duration::from_secs(ORPHAN_SWEEP_INTERVAL_SECS),
            orphan_max_age: Duration::from_secs(ORPHAN_MAX_AGE_SECS),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<ConverterConfig>);

impl From<ConverterConfig> for Config {
    fn from(config: ConverterConfig) -> Self {
        Config(Box::new(config))
    }
}

impl Config {
    fn as_converter(&self) -> &ConverterConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ConverterConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_converter().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_converter().base.environment)
    }

    /// Error details (source chains) are only exposed to clients in development
    pub fn is_development(&self) -> bool {
        is_development_name(&self.as_converter().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.as_converter().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_converter().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_converter().base.environment
    }

    pub fn request_timeout(&self) -> Duration {
        self.as_converter().base.request_timeout
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_converter().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.as_converter().base.log_format
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.as_converter().upload_dir
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.as_converter().output_dir
    }

    pub fn static_dir(&self) -> &PathBuf {
        &self.as_converter().static_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_converter().max_upload_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.as_converter().allowed_content_types
    }

    pub fn upload_retention(&self) -> Duration {
        self.as_converter().upload_retention
    }

    pub fn output_retention(&self) -> Duration {
        self.as_converter().output_retention
    }

    pub fn orphan_sweep_interval(&self) -> Duration {
        self.as_converter().orphan_sweep_interval
    }

    pub fn orphan_max_age(&self) -> Duration {
        self.as_converter().orphan_max_age
    }
}

/// Environment name from `ENVIRONMENT`, `APP_ENV` or `NODE_ENV`, in that order.
pub fn environment_from_env() -> String {
    env::var("ENVIRONMENT")
        .or_else(|_| env::var("APP_ENV"))
        .or_else(|_| env::var("NODE_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

pub fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

pub fn is_development_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "development" || env == "dev"
}

fn megabytes_to_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", megabytes))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ConverterConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = environment_from_env();

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins: split_list(&cors_origins_str),
            environment,
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(REQUEST_TIMEOUT_SECS),
            ),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = ConverterConfig {
            base,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            max_upload_size_bytes: megabytes_to_bytes(max_upload_size_mb)?,
            allowed_content_types: env::var("ALLOWED_CONTENT_TYPES")
                .unwrap_or_else(|_| "application/pdf".to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            upload_retention: Duration::from_secs(
                env::var("UPLOAD_RETENTION_SECS")
                    .unwrap_or_else(|_| UPLOAD_RETENTION_SECS.to_string())
                    .parse()
                    .unwrap_or(UPLOAD_RETENTION_SECS),
            ),
            output_retention: Duration::from_secs(
                env::var("OUTPUT_RETENTION_SECS")
                    .unwrap_or_else(|_| OUTPUT_RETENTION_SECS.to_string())
                    .parse()
                    .unwrap_or(OUTPUT_RETENTION_SECS),
            ),
            orphan_sweep_interval: Duration::from_secs(
                env::var("ORPHAN_SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| ORPHAN_SWEEP_INTERVAL_SECS.to_string())
                    .parse()
                    .unwrap_or(ORPHAN_SWEEP_INTERVAL_SECS),
            ),
            orphan_max_age: Duration::from_secs(
                env::var("ORPHAN_MAX_AGE_SECS")
                    .unwrap_or_else(|_| ORPHAN_MAX_AGE_SECS.to_string())
                    .parse()
                    .unwrap_or(ORPHAN_MAX_AGE_SECS),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if is_production_name(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        // The body limit adds multipart overhead on top of the ceiling
        if self.max_upload_size_bytes > usize::MAX / 2 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one MIME type"
            ));
        }

        if self.base.request_timeout.is_zero() {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        if self.upload_dir == self.output_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and OUTPUT_DIR must be different directories"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.max_upload_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.allowed_content_types(), ["application/pdf"]);
        assert_eq!(config.upload_retention(), Duration::from_secs(1));
        assert_eq!(config.output_retention(), Duration::from_secs(120));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut converter = ConverterConfig::default();
        converter.base.environment = "production".to_string();
        assert!(converter.validate().is_err());

        converter.base.cors_origins = vec!["https://convert.example.com".to_string()];
        assert!(converter.validate().is_ok());
    }

    #[test]
    fn test_shared_directories_rejected() {
        let converter = ConverterConfig {
            output_dir: PathBuf::from("uploads"),
            ..ConverterConfig::default()
        };
        assert!(converter.validate().is_err());
    }

    #[test]
    fn test_environment_names() {
        assert!(is_production_name("PROD"));
        assert!(is_production_name("production"));
        assert!(!is_production_name("staging"));
        assert!(is_development_name("Development"));
        assert!(!is_development_name("test"));
    }

    #[test]
    fn test_upload_size_conversion() {
        assert_eq!(megabytes_to_bytes(10).unwrap(), 10 * 1024 * 1024);
        assert!(megabytes_to_bytes(usize::MAX).is_err());

        let converter = ConverterConfig {
            max_upload_size_bytes: usize::MAX,
            ..ConverterConfig::default()
        };
        assert!(converter.validate().is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" https://a.example, ,https://b.example "),
            vec!["https://a.example", "https://b.example"]
        );
    }
}
