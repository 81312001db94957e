//! @ai:module:intent Configuration structs for the evaluation service
//! @ai:module:layer infrastructure
//! @ai:module:public_api AppConfig, ServerConfig, CompletionConfig, ChartConfig, DeliveryConfig, PipelineConfig, Credentials
//! @ai:module:stateless true

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// @ai:intent Main configuration for the evaluation service
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// @ai:intent HTTP server configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Include internal error details in 500 responses (development only)
    #[serde(default)]
    pub expose_error_details: bool,
}

/// @ai:intent Text-completion provider configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// @ai:intent Which chart renderer produces image references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Remote chart-image URLs
    Quickchart,
    /// Self-hosted SVG data URIs
    Svg,
}

/// @ai:intent Chart rendering configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_renderer")]
    pub renderer: RendererKind,
    #[serde(default = "default_chart_url")]
    pub base_url: String,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: String,
}

/// @ai:intent Email delivery configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_delivery_url")]
    pub base_url: String,
    #[serde(default = "default_owner_inbox")]
    pub owner_inbox: String,
    #[serde(default = "default_report_subject")]
    pub report_subject: String,
    #[serde(default = "default_contact_subject")]
    pub contact_subject: String,
    /// Sender identity; `DELIVERY_SENDER` takes precedence when set
    #[serde(default)]
    pub sender: Option<String>,
}

/// @ai:intent Pipeline execution configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            expose_error_details: false,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            requests_per_minute: default_rate_limit(),
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            renderer: default_renderer(),
            base_url: default_chart_url(),
            width: default_chart_width(),
            height: default_chart_height(),
            background: default_background(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: default_delivery_url(),
            owner_inbox: default_owner_inbox(),
            report_subject: default_report_subject(),
            contact_subject: default_contact_subject(),
            sender: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

impl PipelineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_completion_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_rate_limit() -> u32 {
    60
}

fn default_max_concurrent() -> usize {
    4
}

fn default_request_timeout() -> u64 {
    120
}

fn default_renderer() -> RendererKind {
    RendererKind::Quickchart
}

fn default_chart_url() -> String {
    "https://quickchart.io/chart".to_string()
}

fn default_chart_width() -> u32 {
    400
}

fn default_chart_height() -> u32 {
    300
}

fn default_background() -> String {
    "white".to_string()
}

fn default_delivery_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_owner_inbox() -> String {
    "owner@example.com".to_string()
}

fn default_report_subject() -> String {
    "Your Idea Evaluation Report".to_string()
}

fn default_contact_subject() -> String {
    "New Contact Message from Idea Evaluator".to_string()
}

fn default_timeout() -> u64 {
    50
}

impl AppConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// @ai:intent Errors raised while assembling runtime configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment")]
    MissingVar(&'static str),

    #[error("No sender identity configured (set DELIVERY_SENDER or delivery.sender)")]
    MissingSender,
}

/// @ai:intent Provider credentials, sourced from the environment only
#[derive(Clone)]
pub struct Credentials {
    pub completion_api_key: String,
    pub delivery_api_key: String,
    pub sender: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("completion_api_key", &"<redacted>")
            .field("delivery_api_key", &"<redacted>")
            .field("sender", &self.sender)
            .finish()
    }
}

impl Credentials {
    /// @ai:intent Read credentials from process environment
    /// @ai:post returns Err before any provider is contacted when a secret is missing
    /// @ai:effects env
    pub fn from_env(delivery: &DeliveryConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(delivery, |name| std::env::var(name).ok())
    }

    /// @ai:intent Resolve credentials through an arbitrary variable lookup
    /// @ai:effects pure
    pub fn from_lookup<F>(delivery: &DeliveryConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let completion_api_key = non_empty("COMPLETION_API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .ok_or(ConfigError::MissingVar("COMPLETION_API_KEY"))?;

        let delivery_api_key =
            non_empty("DELIVERY_API_KEY").ok_or(ConfigError::MissingVar("DELIVERY_API_KEY"))?;

        let sender = non_empty("DELIVERY_SENDER")
            .or_else(|| delivery.sender.clone())
            .ok_or(ConfigError::MissingSender)?;

        Ok(Self {
            completion_api_key,
            delivery_api_key,
            sender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_service_constants() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.timeout_secs, 50);
        assert_eq!(config.charts.width, 400);
        assert_eq!(config.charts.height, 300);
        assert_eq!(config.charts.renderer, RendererKind::Quickchart);
        assert!(!config.server.expose_error_details);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("evaluator.toml");

        let mut config = AppConfig::default();
        config.pipeline.timeout_secs = 30;
        config.charts.renderer = RendererKind::Svg;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.pipeline.timeout_secs, 30);
        assert_eq!(loaded.charts.renderer, RendererKind::Svg);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("evaluator.toml");
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0:8080\"\n").unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.server.bind, "0.0.0.0:8080");
        assert_eq!(loaded.completion.model, "gemini-1.5-flash");
        assert_eq!(loaded.delivery.report_subject, "Your Idea Evaluation Report");
    }

    #[test]
    fn test_credentials_fall_back_to_gemini_key() {
        let delivery = DeliveryConfig::default();
        let creds = Credentials::from_lookup(
            &delivery,
            lookup(&[
                ("GEMINI_API_KEY", "g-key"),
                ("DELIVERY_API_KEY", "d-key"),
                ("DELIVERY_SENDER", "reports@example.com"),
            ]),
        )
        .unwrap();
        assert_eq!(creds.completion_api_key, "g-key");
        assert_eq!(creds.sender, "reports@example.com");
    }

    #[test]
    fn test_credentials_missing_delivery_key() {
        let delivery = DeliveryConfig::default();
        let err = Credentials::from_lookup(&delivery, lookup(&[("COMPLETION_API_KEY", "k")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DELIVERY_API_KEY")));
    }

    #[test]
    fn test_credentials_sender_from_config() {
        let delivery = DeliveryConfig {
            sender: Some("noreply@example.com".to_string()),
            ..Default::default()
        };
        let creds = Credentials::from_lookup(
            &delivery,
            lookup(&[("COMPLETION_API_KEY", "k"), ("DELIVERY_API_KEY", "d")]),
        )
        .unwrap();
        assert_eq!(creds.sender, "noreply@example.com");
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials {
            completion_api_key: "super-secret".to_string(),
            delivery_api_key: "also-secret".to_string(),
            sender: "reports@example.com".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("also-secret"));
        assert!(debug.contains("reports@example.com"));
    }
}
