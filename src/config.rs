use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_QUERY_API_URL: &str = "https://api.sec-api.io";
pub const DEFAULT_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/";
pub const DEFAULT_SUBMISSIONS_URL: &str = "https://data.sec.gov/submissions/";

// SEC fair-access policy allows 10 requests per second
const DEFAULT_REQUEST_INTERVAL_MS: u64 = 150;

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ConfigYaml {
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
    pub query_api_url: Option<String>,
    pub archives_url: Option<String>,
    pub submissions_url: Option<String>,
    pub output_dir: Option<String>,
    pub request_interval_ms: Option<u64>,
}

/// Settings every pipeline needs, resolved once at process start and handed
/// to the clients that use them.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
    pub query_api_url: String,
    pub archives_url: String,
    pub submissions_url: String,
    pub output_dir: PathBuf,
    pub request_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            user_agent: None,
            query_api_url: DEFAULT_QUERY_API_URL.to_string(),
            archives_url: DEFAULT_ARCHIVES_URL.to_string(),
            submissions_url: DEFAULT_SUBMISSIONS_URL.to_string(),
            output_dir: PathBuf::from("output"),
            request_interval: Duration::from_millis(DEFAULT_REQUEST_INTERVAL_MS),
        }
    }
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Self::from_env()
        }
    }

    // Load configuration from YAML file
    pub fn from_yaml(file_path: &str) -> Result<Self, ConfigError> {
        let yaml_content = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
            path: file_path.to_string(),
            source,
        })?;

        let yaml_config: ConfigYaml =
            serde_yaml::from_str(&yaml_content).map_err(|source| ConfigError::Parse {
                path: file_path.to_string(),
                source,
            })?;

        Ok(Self::from_parts(yaml_config))
    }

    // Load all configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let request_interval_ms = match env::var("REQUEST_INTERVAL_MS") {
            Ok(value) => Some(value.parse().map_err(|_| ConfigError::Invalid {
                key: "REQUEST_INTERVAL_MS",
                value,
            })?),
            Err(_) => None,
        };

        Ok(Self::from_parts(ConfigYaml {
            api_key: env::var("SEC_API_KEY").ok(),
            user_agent: env::var("SEC_USER_AGENT").ok(),
            query_api_url: env::var("SEC_QUERY_API_URL").ok(),
            archives_url: env::var("SEC_ARCHIVES_URL").ok(),
            submissions_url: env::var("SEC_SUBMISSIONS_URL").ok(),
            output_dir: env::var("OUTPUT_DIR").ok(),
            request_interval_ms,
        }))
    }

    fn from_parts(raw: ConfigYaml) -> Self {
        let defaults = Self::default();
        Self {
            api_key: raw.api_key.filter(|s| !s.trim().is_empty()),
            user_agent: raw.user_agent.filter(|s| !s.trim().is_empty()),
            query_api_url: raw.query_api_url.unwrap_or(defaults.query_api_url),
            archives_url: with_trailing_slash(raw.archives_url.unwrap_or(defaults.archives_url)),
            submissions_url: with_trailing_slash(
                raw.submissions_url.unwrap_or(defaults.submissions_url),
            ),
            output_dir: raw.output_dir.map(PathBuf::from).unwrap_or(defaults.output_dir),
            request_interval: raw
                .request_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_interval),
        }
    }

    /// Credential for the query API. Only the 10-K pipeline needs it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::Missing("SEC_API_KEY"))
    }

    /// Identifying header EDGAR requires on every request.
    pub fn require_user_agent(&self) -> Result<&str, ConfigError> {
        self.user_agent
            .as_deref()
            .ok_or(ConfigError::Missing("SEC_USER_AGENT"))
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_key: abc123\nuser_agent: \"Jane Doe jane@example.com\"\narchives_url: http://localhost:9000/Archives\nrequest_interval_ms: 0"
        )
        .unwrap();

        let config = AppConfig::from_yaml(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "abc123");
        assert_eq!(config.require_user_agent().unwrap(), "Jane Doe jane@example.com");
        assert_eq!(config.archives_url, "http://localhost:9000/Archives/");
        assert_eq!(config.submissions_url, DEFAULT_SUBMISSIONS_URL);
        assert_eq!(config.request_interval, Duration::ZERO);
    }

    #[test]
    fn test_missing_credentials() {
        let config = AppConfig::from_parts(ConfigYaml {
            api_key: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::Missing("SEC_API_KEY"))
        ));
        assert!(matches!(
            config.require_user_agent(),
            Err(ConfigError::Missing("SEC_USER_AGENT"))
        ));
    }

    #[test]
    fn test_unreadable_file() {
        let err = AppConfig::from_yaml("/nonexistent/edgar-signals.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
