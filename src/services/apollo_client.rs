use anyhow::{bail, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::{
    configuration::{parse_base_url, EnrichmentSettings},
    domain::confidence::ContactSignals,
};

const API_KEY_HEADER: &str = "X-Api-Key";

/// The contact-data lookups the enrichment pass relies on.
#[async_trait]
pub trait ContactProvider: Send + Sync {
    async fn organization_domain(&self, company: &str) -> anyhow::Result<Option<String>>;

    async fn match_person(&self, request: &PersonMatchRequest)
        -> anyhow::Result<Option<ApolloPerson>>;

    async fn search_person(&self, keywords: &str) -> anyhow::Result<Option<ApolloPerson>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonMatchRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    pub reveal_personal_emails: bool,
    pub reveal_phone_number: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApolloPerson {
    pub id: Option<String>,
    pub email: Option<String>,
    pub email_status: Option<String>,
    pub extrapolated_email_confidence: Option<f64>,
    pub personal_emails: Option<Vec<String>>,
    pub phone_number: Option<String>,
    pub phone_numbers: Option<Vec<ApolloPhone>>,
    pub organization_name: Option<String>,
    pub organization: Option<ApolloOrganization>,
    pub title: Option<String>,
    pub linkedin_url: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApolloPhone {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sanitized_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApolloOrganization {
    pub name: Option<String>,
    pub website_url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ApolloPerson {
    pub fn best_email(&self) -> Option<&str> {
        non_empty(&self.email).or_else(|| {
            self.personal_emails
                .iter()
                .flatten()
                .map(|e| e.trim())
                .find(|e| !e.is_empty())
        })
    }

    /// Direct number first, then a mobile entry, then whatever is listed first.
    pub fn best_phone(&self) -> Option<&str> {
        if let Some(phone) = non_empty(&self.phone_number) {
            return Some(phone);
        }

        let numbers = self.phone_numbers.as_deref().unwrap_or_default();
        numbers
            .iter()
            .find(|p| p.kind.as_deref() == Some("mobile"))
            .or_else(|| numbers.first())
            .and_then(|p| non_empty(&p.sanitized_number))
    }

    pub fn organization(&self) -> Option<&str> {
        non_empty(&self.organization_name).or_else(|| {
            self.organization
                .as_ref()
                .and_then(|org| non_empty(&org.name))
        })
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    pub fn signals(&self) -> ContactSignals {
        ContactSignals {
            has_email: self.best_email().is_some(),
            has_phone: self.best_phone().is_some(),
            has_organization: self.organization().is_some(),
            updated_at: self.updated_at(),
        }
    }
}

#[derive(Deserialize)]
struct MatchResponse {
    person: Option<ApolloPerson>,
}

#[derive(Deserialize)]
struct PeopleSearchResponse {
    people: Option<Vec<ApolloPerson>>,
}

#[derive(Deserialize)]
struct OrganizationSearchResponse {
    organizations: Option<Vec<ApolloOrganization>>,
}

#[derive(Serialize)]
struct OrganizationSearchBody<'a> {
    q_organization_name: &'a str,
    page: u32,
    per_page: u32,
}

#[derive(Serialize)]
struct PeopleSearchBody<'a> {
    q_keywords: &'a str,
    page: u32,
    per_page: u32,
    reveal_personal_emails: bool,
    reveal_phone_numbers: bool,
}

pub struct ApolloClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl ApolloClient {
    pub fn new(api_key: String, settings: &EnrichmentSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build enrichment http client")?;
        let base_url = parse_base_url(&settings.base_url).context("Invalid enrichment base url")?;

        Ok(ApolloClient {
            client,
            api_key,
            base_url,
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> anyhow::Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let res = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .with_context(|| format!("No response from enrichment api at {}", path))?;

        parse_response(res, path).await
    }
}

async fn parse_response<R: DeserializeOwned>(res: Response, path: &str) -> anyhow::Result<R> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        log::error!("Enrichment api {} returned {}: {}", path, status, text);
        bail!("Apollo API error: {}", status.as_u16());
    }

    res.json::<R>()
        .await
        .with_context(|| format!("Malformed response from enrichment api at {}", path))
}

#[async_trait]
impl ContactProvider for ApolloClient {
    async fn organization_domain(&self, company: &str) -> anyhow::Result<Option<String>> {
        let body = OrganizationSearchBody {
            q_organization_name: company,
            page: 1,
            per_page: 1,
        };
        let res: OrganizationSearchResponse =
            self.post("api/v1/organizations/search", &body).await?;

        Ok(res
            .organizations
            .unwrap_or_default()
            .into_iter()
            .find_map(|org| org.website_url))
    }

    async fn match_person(
        &self,
        request: &PersonMatchRequest,
    ) -> anyhow::Result<Option<ApolloPerson>> {
        let res: MatchResponse = self.post("api/v1/people/match", request).await?;
        Ok(res.person)
    }

    async fn search_person(&self, keywords: &str) -> anyhow::Result<Option<ApolloPerson>> {
        let body = PeopleSearchBody {
            q_keywords: keywords,
            page: 1,
            per_page: 1,
            reveal_personal_emails: true,
            reveal_phone_numbers: true,
        };
        let res: PeopleSearchResponse = self.post("api/v1/mixed_people/search", &body).await?;

        Ok(res.people.unwrap_or_default().into_iter().next())
    }
}
