use serde::{Deserialize, Serialize};

use super::{confidence::Confidence, profile::Profile};

const PHONE_PREFIXES: [&str; 4] = ["555", "444", "333", "222"];
const FALLBACK_EMAIL_DOMAIN: &str = "company";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailAccuracy {
    #[default]
    None,
    Low,
    Medium,
    High,
    Estimated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentSource {
    ApolloMatch,
    ApolloSearch,
    Demo,
}

/// Keys written by enrichment. Stale copies on a re-submitted profile are dropped.
pub const ENRICHMENT_FIELDS: [&str; 11] = [
    "apolloEnriched",
    "apolloId",
    "verifiedEmail",
    "emailStatus",
    "emailAccuracy",
    "directPhone",
    "hasEmail",
    "hasDirectPhone",
    "source",
    "lastUpdated",
    "note",
];

pub fn clear_enrichment_fields(profile: &mut Profile) {
    profile
        .extra
        .retain(|key, _| !ENRICHMENT_FIELDS.contains(&key.as_str()));
}

/// A profile with whatever contact data the enrichment pass attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub apollo_enriched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apollo_id: Option<String>,
    pub verified_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,
    pub email_accuracy: EmailAccuracy,
    pub direct_phone: Option<String>,
    pub has_email: bool,
    pub has_direct_phone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<EnrichmentSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EnrichedProfile {
    /// The profile untouched apart from a note explaining why.
    pub fn not_enriched(profile: Profile, note: impl Into<String>) -> Self {
        Self {
            profile,
            apollo_enriched: false,
            apollo_id: None,
            verified_email: None,
            email_status: None,
            email_accuracy: EmailAccuracy::None,
            direct_phone: None,
            has_email: false,
            has_direct_phone: false,
            source: None,
            last_updated: None,
            note: Some(note.into()),
        }
    }

    pub fn with_placeholder_contact(mut profile: Profile, index: usize, note: &str) -> Self {
        let email = placeholder_email(&profile, index);
        let phone = placeholder_phone(index);
        profile.email = Some(email.clone());
        profile.phone = Some(phone.clone());

        Self {
            profile,
            apollo_enriched: false,
            apollo_id: None,
            verified_email: Some(email),
            email_status: None,
            email_accuracy: EmailAccuracy::Estimated,
            direct_phone: Some(phone),
            has_email: true,
            has_direct_phone: true,
            source: Some(EnrichmentSource::Demo),
            last_updated: None,
            note: Some(note.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStats {
    pub total: usize,
    pub with_email: usize,
    pub high_confidence: usize,
    pub verified: usize,
}

impl EmailStats {
    pub fn collect(profiles: &[EnrichedProfile]) -> Self {
        Self {
            total: profiles.len(),
            with_email: profiles.iter().filter(|p| p.verified_email.is_some()).count(),
            high_confidence: profiles
                .iter()
                .filter(|p| p.profile.confidence == Confidence::High)
                .count(),
            verified: profiles
                .iter()
                .filter(|p| p.email_status.as_deref() == Some("verified"))
                .count(),
        }
    }
}

fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// `first.last@company.com`, derived only from the profile's name and company.
pub fn placeholder_email(profile: &Profile, index: usize) -> String {
    let (first, last) = profile.split_name();
    let local_part = [slug(first), slug(last)]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<String>>()
        .join(".");
    let local_part = match local_part.is_empty() {
        true => format!("contact{}", index + 1),
        false => local_part,
    };

    let domain = profile
        .known_company()
        .map(slug)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| FALLBACK_EMAIL_DOMAIN.to_string());

    format!("{}@{}.com", local_part, domain)
}

pub fn placeholder_phone(index: usize) -> String {
    let prefix = PHONE_PREFIXES[index % PHONE_PREFIXES.len()];
    format!("+1-{}-{}-{}", prefix, 100 + index, 1000 + index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::COMPANY_PLACEHOLDER;

    fn profile(name: &str, company: &str) -> Profile {
        Profile {
            name: name.to_string(),
            company: company.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn placeholder_email_valid() {
        assert_eq!(
            placeholder_email(&profile("Jane Doe", "Acme Corp"), 0),
            "jane.doe@acmecorp.com"
        );
        assert_eq!(
            placeholder_email(&profile("Cher", COMPANY_PLACEHOLDER), 0),
            "cher@company.com"
        );
        assert_eq!(placeholder_email(&profile("", ""), 2), "contact3@company.com");
    }

    #[test]
    fn placeholder_phone_cycles_prefixes() {
        assert_eq!(placeholder_phone(0), "+1-555-100-1000");
        assert_eq!(placeholder_phone(1), "+1-444-101-1001");
        assert_eq!(placeholder_phone(4), "+1-555-104-1004");
    }

    #[test]
    fn enriched_profile_serializes_flat_and_camel_case() {
        let enriched = EnrichedProfile::not_enriched(profile("Jane Doe", "Acme"), "No match");
        let json = serde_json::to_value(&enriched).unwrap();

        assert_eq!(json["name"], "Jane Doe");
        assert_eq!(json["apolloEnriched"], false);
        assert_eq!(json["emailAccuracy"], "none");
        assert_eq!(json["note"], "No match");
        assert!(json.get("apolloId").is_none());
    }

    #[test]
    fn email_stats_counts() {
        let mut high = EnrichedProfile::with_placeholder_contact(profile("A B", "C"), 0, "demo");
        high.profile.confidence = Confidence::High;
        high.email_status = Some("verified".to_string());
        let demo = EnrichedProfile::with_placeholder_contact(profile("D E", "F"), 1, "demo");
        let none = EnrichedProfile::not_enriched(profile("G H", "I"), "none");

        let stats = EmailStats::collect(&[high, demo, none]);

        assert_eq!(
            stats,
            EmailStats {
                total: 3,
                with_email: 2,
                high_confidence: 1,
                verified: 1,
            }
        );
    }

    #[test]
    fn resubmitted_profile_does_not_repeat_enrichment_keys() {
        let mut resubmitted: Profile = serde_json::from_str(
            r#"{"name": "Jane Doe", "company": "Acme", "note": "old", "apolloEnriched": true, "crmId": 9}"#,
        )
        .unwrap();
        clear_enrichment_fields(&mut resubmitted);

        let enriched = EnrichedProfile::with_placeholder_contact(resubmitted, 0, "fresh");
        let json = serde_json::to_string(&enriched).unwrap();

        assert_eq!(json.matches(r#""note""#).count(), 1);
        assert_eq!(json.matches(r#""apolloEnriched""#).count(), 1);
        assert!(json.contains(r#""note":"fresh""#));
        assert!(json.contains(r#""crmId":9"#));
    }
}
