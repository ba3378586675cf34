use std::{num::NonZeroU32, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Serialize;

use crate::{
    configuration::EnrichmentSettings,
    domain::{
        confidence::{Confidence, ConfidencePolicy},
        contact::{EmailAccuracy, EnrichedProfile, EnrichmentSource},
        profile::Profile,
    },
};

use super::{ApolloClient, ApolloPerson, ContactProvider, PersonMatchRequest};

pub const DEMO_NOTE: &str = "Demo contact data. Set APOLLO_API_KEY for verified contact enrichment";
const NO_MATCH_NOTE: &str = "No match found in the contact database";
const NO_NAME_NOTE: &str = "Profile has no name to look up";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentMode {
    Live,
    Demo,
}

/// Attaches contact data to profiles. Never fails as a whole: problems end up as a
/// note on the affected profile.
#[async_trait]
pub trait Enricher: Send + Sync {
    fn mode(&self) -> EnrichmentMode;

    async fn enrich(&self, profiles: Vec<Profile>) -> Vec<EnrichedProfile>;
}

pub fn enricher_from_settings(settings: &EnrichmentSettings) -> anyhow::Result<Arc<dyn Enricher>> {
    match settings.api_key() {
        Some(api_key) => {
            log::info!("Contact enrichment running against the live api");
            let client = ApolloClient::new(api_key, settings)?;
            Ok(Arc::new(LiveEnricher::new(client, settings)))
        }
        None => {
            log::info!("No enrichment api key configured, using demo contact data");
            Ok(Arc::new(DemoEnricher::new(settings.profile_limit())))
        }
    }
}

/// Gap between consecutive units of work, measured from the end of the previous one.
///
/// Backed by a one-token bucket that is emptied by `finished`, so the next `wait`
/// returns a full period after the previous unit completed.
pub struct Pacer {
    quota: Option<Quota>,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        let quota = Quota::with_period(delay).map(|quota| quota.allow_burst(NonZeroU32::MIN));

        Pacer {
            quota,
            limiter: None,
        }
    }

    pub fn finished(&mut self) {
        self.limiter = self.quota.map(|quota| {
            let limiter = RateLimiter::direct(quota);
            let _ = limiter.check();
            limiter
        });
    }

    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

pub struct DemoEnricher {
    limit: usize,
}

impl DemoEnricher {
    pub fn new(limit: usize) -> Self {
        DemoEnricher { limit }
    }
}

#[async_trait]
impl Enricher for DemoEnricher {
    fn mode(&self) -> EnrichmentMode {
        EnrichmentMode::Demo
    }

    async fn enrich(&self, profiles: Vec<Profile>) -> Vec<EnrichedProfile> {
        profiles
            .into_iter()
            .take(self.limit)
            .enumerate()
            .map(|(index, profile)| {
                EnrichedProfile::with_placeholder_contact(profile, index, DEMO_NOTE)
            })
            .collect()
    }
}

pub struct LiveEnricher<P> {
    provider: P,
    policy: ConfidencePolicy,
    limit: usize,
    delay: Duration,
    resolve_company_domain: bool,
}

impl<P: ContactProvider> LiveEnricher<P> {
    pub fn new(provider: P, settings: &EnrichmentSettings) -> Self {
        LiveEnricher {
            provider,
            policy: settings.confidence.clone(),
            limit: settings.profile_limit(),
            delay: settings.delay(),
            resolve_company_domain: settings.resolve_company_domain,
        }
    }

    async fn enrich_one(&self, profile: Profile) -> EnrichedProfile {
        log::info!("Enriching: {} at {}", profile.name, profile.company);

        match self.try_enrich(&profile).await {
            Ok(enriched) => enriched,
            Err(e) => {
                log::error!("Error enriching {}: {:?}", profile.name, e);
                EnrichedProfile::not_enriched(profile, format!("Enrichment failed: {}", e))
            }
        }
    }

    async fn try_enrich(&self, profile: &Profile) -> anyhow::Result<EnrichedProfile> {
        if profile.name.trim().is_empty() {
            return Ok(EnrichedProfile::not_enriched(profile.clone(), NO_NAME_NOTE));
        }

        let domain = match (self.resolve_company_domain, profile.known_company()) {
            (true, Some(company)) => self.lookup_domain(company).await,
            _ => None,
        };

        let request = match_request(profile, domain);
        if let Some(person) = self.provider.match_person(&request).await? {
            return Ok(self.apply(profile.clone(), &person, EnrichmentSource::ApolloMatch));
        }

        log::info!("No direct match for {}, trying keyword search", profile.name);
        match self.provider.search_person(&fallback_keywords(profile)).await? {
            Some(person) => Ok(self.apply(profile.clone(), &person, EnrichmentSource::ApolloSearch)),
            None => {
                let mut profile = profile.clone();
                profile.confidence = Confidence::Low;
                Ok(EnrichedProfile::not_enriched(profile, NO_MATCH_NOTE))
            }
        }
    }

    async fn lookup_domain(&self, company: &str) -> Option<String> {
        match self.provider.organization_domain(company).await {
            Ok(domain) => domain,
            Err(e) => {
                log::error!("Company domain lookup failed for {}: {:?}", company, e);
                None
            }
        }
    }

    fn apply(
        &self,
        mut profile: Profile,
        person: &ApolloPerson,
        source: EnrichmentSource,
    ) -> EnrichedProfile {
        let email = person.best_email().map(str::to_string);
        let phone = person.best_phone().map(str::to_string);

        profile.email = email.clone();
        profile.phone = phone.clone();
        if let Some(organization) = person.organization() {
            profile.company = organization.to_string();
        }
        profile.confidence = self.policy.assess(&person.signals(), Utc::now());

        EnrichedProfile {
            profile,
            apollo_enriched: true,
            apollo_id: person.id.clone(),
            has_email: email.is_some(),
            has_direct_phone: phone.is_some(),
            verified_email: email,
            email_status: person.email_status.clone(),
            email_accuracy: email_accuracy(person),
            direct_phone: phone,
            source: Some(source),
            last_updated: person.updated_at.clone(),
            note: None,
        }
    }
}

#[async_trait]
impl<P: ContactProvider> Enricher for LiveEnricher<P> {
    fn mode(&self) -> EnrichmentMode {
        EnrichmentMode::Live
    }

    async fn enrich(&self, profiles: Vec<Profile>) -> Vec<EnrichedProfile> {
        let mut pacer = Pacer::new(self.delay);
        let mut enriched = Vec::with_capacity(profiles.len().min(self.limit));

        for profile in profiles.into_iter().take(self.limit) {
            pacer.wait().await;
            enriched.push(self.enrich_one(profile).await);
            pacer.finished();
        }

        enriched
    }
}

fn match_request(profile: &Profile, domain: Option<String>) -> PersonMatchRequest {
    let (first_name, last_name) = profile.split_name();
    let linkedin_url = Some(profile.profile_url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string);

    PersonMatchRequest {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        organization_name: profile.known_company().map(str::to_string),
        domain,
        linkedin_url,
        reveal_personal_emails: true,
        reveal_phone_number: true,
    }
}

fn fallback_keywords(profile: &Profile) -> String {
    [
        format!(r#""{}""#, profile.name.trim()),
        profile.title.trim().to_string(),
        profile.known_company().unwrap_or_default().to_string(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty() && part != r#""""#)
    .collect::<Vec<String>>()
    .join(" ")
}

pub fn email_accuracy(person: &ApolloPerson) -> EmailAccuracy {
    if person.best_email().is_none() {
        return EmailAccuracy::None;
    }
    if person.email_status.as_deref() == Some("verified") {
        return EmailAccuracy::High;
    }
    match person.extrapolated_email_confidence {
        Some(c) if c > 0.8 => EmailAccuracy::High,
        Some(c) if c > 0.5 => EmailAccuracy::Medium,
        _ => EmailAccuracy::Low,
    }
}
