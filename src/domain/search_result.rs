use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{
    confidence::Confidence,
    industry::{relevance_score, DEFAULT_INDUSTRY_TAG},
    profile::{Profile, COMPANY_PLACEHOLDER, UNKNOWN_NAME},
    search_query::SearchCriteria,
};

pub const PROFILE_URL_MARKER: &str = "linkedin.com/in/";
const ORGANIC_RESULTS_POINTER: &str = "/results/0/content/results/organic";

static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(.*?) - (.*?) \| LinkedIn",
        r"(.*?) \| LinkedIn",
        r"(.*?) on LinkedIn: (.*)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static NAME_SUFFIXES: [&str; 3] = [" | LinkedIn", " on LinkedIn", " - LinkedIn"];

// The company ends at punctuation, a "(based) in <place>" clause or the end of the snippet.
static COMPANY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\bat\s+", r",\s+", r"\bfrom\s+"]
        .iter()
        .filter_map(|lead| {
            Regex::new(&format!(
                r"(?i){}([^.,|]+?)(?:\s+(?:based\s+)?in\b|[.,|]|$)",
                lead
            ))
            .ok()
        })
        .collect()
});

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub url: Option<String>,
}

pub fn extract_name(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return UNKNOWN_NAME.to_string();
    }

    let matched = NAME_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(title))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .find(|name| !name.is_empty());

    let name = matched.unwrap_or_else(|| {
        NAME_SUFFIXES
            .iter()
            .fold(title.to_string(), |acc, suffix| acc.replacen(suffix, "", 1))
            .trim()
            .to_string()
    });

    match name.is_empty() {
        true => UNKNOWN_NAME.to_string(),
        false => name,
    }
}

pub fn extract_company(snippet: &str) -> Option<String> {
    COMPANY_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(snippet))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .find(|company| !company.is_empty())
}

/// Profiles found in a raw search-provider response, most relevant first.
///
/// Only results linking to a profile page are kept. Ids follow the position in the
/// organic list. A response without the expected shape yields no profiles.
pub fn extract_profiles(response: &Value, criteria: &SearchCriteria) -> Vec<Profile> {
    let organic = match response
        .pointer(ORGANIC_RESULTS_POINTER)
        .and_then(Value::as_array)
    {
        Some(organic) => organic,
        None => return vec![],
    };

    let filter = criteria.industry_filter();
    let industry = criteria
        .industry
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_INDUSTRY_TAG);

    let mut profiles: Vec<Profile> = organic
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let result = OrganicResult::deserialize(item).ok()?;
            let url = result.url.filter(|u| u.contains(PROFILE_URL_MARKER))?;
            let title = result.title.unwrap_or_default();
            let snippet = result.snippet.unwrap_or_default();

            Some(Profile {
                id: index as u32 + 1,
                name: extract_name(&title),
                title: criteria.designation.clone(),
                company: extract_company(&snippet)
                    .unwrap_or_else(|| COMPANY_PLACEHOLDER.to_string()),
                location: criteria.location.clone(),
                industry: industry.to_string(),
                profile_url: url,
                email: None,
                phone: None,
                relevance_score: relevance_score(filter, &title, &snippet),
                snippet: Some(snippet),
                confidence: Confidence::Low,
                extra: Default::default(),
            })
        })
        .collect();

    // Stable, so equal scores keep their extraction order.
    profiles.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

    profiles
}
