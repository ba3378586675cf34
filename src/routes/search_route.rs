use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::SearchSettings,
    domain::{profile::Profile, search_query::SearchCriteria},
    routes::error_response,
    services::{search_profiles, SearchProvider},
};

const SOURCE: &str = "oxylabs";
const NO_PROFILES_NOTE: &str = "No LinkedIn profiles found for this search";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    designation: Option<String>,
    location: Option<String>,
    lead_count: Option<i64>,
    industry: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    success: bool,
    profiles: Vec<Profile>,
    count: usize,
    industry: Option<String>,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lead_limit(requested: Option<i64>, settings: &SearchSettings) -> u32 {
    let max = settings.max_lead_count.max(1);
    match requested {
        Some(count) => count.clamp(1, max as i64) as u32,
        None => settings.default_lead_count.clamp(1, max),
    }
}

pub async fn search(
    provider: web::Data<dyn SearchProvider>,
    settings: web::Data<SearchSettings>,
    body: web::Json<SearchBody>,
) -> HttpResponse {
    let (designation, location) = match (required(&body.designation), required(&body.location)) {
        (Some(designation), Some(location)) => (designation, location),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Designation and location are required",
            )
        }
    };

    let criteria = SearchCriteria {
        designation,
        location,
        industry: required(&body.industry),
    };
    let limit = lead_limit(body.lead_count, &settings);

    match search_profiles(provider.get_ref(), &criteria, limit).await {
        Ok(profiles) => HttpResponse::Ok().json(SearchResponse {
            success: true,
            count: profiles.len(),
            note: profiles.is_empty().then_some(NO_PROFILES_NOTE),
            profiles,
            industry: criteria.industry,
            source: SOURCE,
        }),
        Err(e) => {
            log::error!("Search failed: {:?}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Search failed: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SearchSettings {
        SearchSettings {
            base_url: "https://realtime.oxylabs.io".to_string(),
            username: None,
            password: None,
            default_lead_count: 10,
            max_lead_count: 100,
            timeout_secs: 30,
        }
    }

    #[test]
    fn lead_limit_defaults_and_clamps() {
        assert_eq!(lead_limit(None, &settings()), 10);
        assert_eq!(lead_limit(Some(25), &settings()), 25);
        assert_eq!(lead_limit(Some(0), &settings()), 1);
        assert_eq!(lead_limit(Some(-4), &settings()), 1);
        assert_eq!(lead_limit(Some(5000), &settings()), 100);
    }

    #[test]
    fn blank_fields_are_missing() {
        assert_eq!(required(&Some("  ".to_string())), None);
        assert_eq!(required(&None), None);
        assert_eq!(required(&Some(" CEO ".to_string())), Some("CEO".to_string()));
    }
}
