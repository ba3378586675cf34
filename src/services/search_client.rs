use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::{
    configuration::{parse_base_url, SearchSettings},
    domain::{
        profile::Profile,
        search_query::{build_search_query, SearchCriteria},
        search_result::extract_profiles,
    },
};

/// Anything that can run a web search and hand back the provider's parsed JSON.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, location: &str, limit: u32) -> anyhow::Result<Value>;
}

pub struct OxylabsClient {
    client: Client,
    url: Url,
    credentials: Option<(String, String)>,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    source: &'static str,
    query: &'a str,
    parse: bool,
    limit: u32,
    context: [Value; 2],
}

impl OxylabsClient {
    pub fn new(settings: &SearchSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build search http client")?;
        let url = parse_base_url(&settings.base_url)
            .and_then(|base| base.join("v1/queries"))
            .context("Invalid search base url")?;

        Ok(OxylabsClient {
            client,
            url,
            credentials: settings.credentials(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl SearchProvider for OxylabsClient {
    async fn search(&self, query: &str, location: &str, limit: u32) -> anyhow::Result<Value> {
        let (username, password) = self
            .credentials
            .as_ref()
            .ok_or_else(|| anyhow!("Search provider credentials not configured"))?;

        let body = QueryBody {
            source: "google_search",
            query,
            parse: true,
            limit,
            context: [
                json!({ "key": "follow_redirects", "value": true }),
                json!({ "key": "location", "value": location }),
            ],
        };

        let res = self
            .client
            .post(self.url.clone())
            .basic_auth(username, Some(password))
            .json(&body)
            .send()
            .await
            .context("No response from search provider")?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            log::error!("Search provider returned {}: {}", status, text);
            bail!("Search provider error: {}", status.as_u16());
        }

        res.json::<Value>()
            .await
            .context("Failed to deserialize search provider response")
    }
}

/// Runs one search for the criteria and extracts the matching profiles.
pub async fn search_profiles(
    provider: &dyn SearchProvider,
    criteria: &SearchCriteria,
    limit: u32,
) -> anyhow::Result<Vec<Profile>> {
    let query = build_search_query(criteria);
    log::info!("Searching with query: {}", query);

    let response = provider.search(&query, &criteria.location, limit).await?;
    let profiles = extract_profiles(&response, criteria);

    log::info!(
        "Extracted {} profiles for industry: {}",
        profiles.len(),
        criteria.industry.as_deref().unwrap_or("all")
    );

    Ok(profiles)
}
