use std::time::Duration;

use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};
use url::Url;

use crate::domain::confidence::ConfidencePolicy;

const MIN_ENRICHED_PROFILES: usize = 5;
const MAX_ENRICHED_PROFILES: usize = 10;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub search: SearchSettings,
    pub enrichment: EnrichmentSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub default_lead_count: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_lead_count: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

impl SearchSettings {
    /// Username and password, only when both are set to something non-blank.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (non_blank(&self.username), non_blank(&self.password)) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct EnrichmentSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_profiles: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub delay_millis: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub resolve_company_domain: bool,
    #[serde(default)]
    pub confidence: ConfidencePolicy,
}

impl EnrichmentSettings {
    pub fn api_key(&self) -> Option<String> {
        non_blank(&self.api_key)
    }

    pub fn profile_limit(&self) -> usize {
        self.max_profiles
            .clamp(MIN_ENRICHED_PROFILES, MAX_ENRICHED_PROFILES)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parses a configured base url so relative joins append to its path instead of
/// replacing the last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("No current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("search.username", std::env::var("OXYLABS_USERNAME").ok())?
        .set_override_option("search.password", std::env::var("OXYLABS_PASSWORD").ok())?
        .set_override_option("enrichment.api_key", std::env::var("APOLLO_API_KEY").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrichment(api_key: Option<&str>, max_profiles: usize) -> EnrichmentSettings {
        EnrichmentSettings {
            base_url: "https://api.apollo.io".to_string(),
            api_key: api_key.map(str::to_string),
            max_profiles,
            delay_millis: 1200,
            timeout_secs: 30,
            resolve_company_domain: true,
            confidence: ConfidencePolicy::default(),
        }
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert_eq!(enrichment(None, 8).api_key(), None);
        assert_eq!(enrichment(Some("   "), 8).api_key(), None);
        assert_eq!(
            enrichment(Some(" key-123 "), 8).api_key(),
            Some("key-123".to_string())
        );
    }

    #[test]
    fn profile_limit_is_clamped() {
        assert_eq!(enrichment(None, 1).profile_limit(), 5);
        assert_eq!(enrichment(None, 8).profile_limit(), 8);
        assert_eq!(enrichment(None, 50).profile_limit(), 10);
    }

    #[test]
    fn search_credentials_need_both_halves() {
        let mut search = SearchSettings {
            base_url: "https://realtime.oxylabs.io".to_string(),
            username: Some("user".to_string()),
            password: None,
            default_lead_count: 10,
            max_lead_count: 100,
            timeout_secs: 30,
        };
        assert!(search.credentials().is_none());

        search.password = Some("secret".to_string());
        assert_eq!(
            search.credentials(),
            Some(("user".to_string(), "secret".to_string()))
        );
    }

    #[test]
    fn environment_parsing() {
        assert!(matches!(
            Environment::try_from("Production".to_string()),
            Ok(Environment::Production)
        ));
        assert!(Environment::try_from("staging".to_string()).is_err());
    }

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let url = parse_base_url("https://proxy.example/apollo").unwrap();
        assert_eq!(
            url.join("api/v1/people/match").unwrap().as_str(),
            "https://proxy.example/apollo/api/v1/people/match"
        );

        let url = parse_base_url("https://api.apollo.io").unwrap();
        assert_eq!(
            url.join("api/v1/people/match").unwrap().as_str(),
            "https://api.apollo.io/api/v1/people/match"
        );
        assert!(parse_base_url("not a url").is_err());
    }
}
