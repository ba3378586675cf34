use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{
        contact::{clear_enrichment_fields, EmailStats, EnrichedProfile},
        profile::Profile,
    },
    routes::error_response,
    services::{Enricher, EnrichmentMode, DEMO_NOTE},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnrichResponse {
    success: bool,
    count: usize,
    mode: EnrichmentMode,
    email_stats: EmailStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
    profiles: Vec<EnrichedProfile>,
}

pub async fn enrich(enricher: web::Data<dyn Enricher>, body: web::Json<Value>) -> HttpResponse {
    let items = match body.get("profiles") {
        Some(Value::Array(items)) => items,
        _ => return error_response(StatusCode::BAD_REQUEST, "Profiles array is required"),
    };

    let profiles: Vec<Profile> = items
        .iter()
        .map(|item| {
            let mut profile = Profile::deserialize(item).unwrap_or_else(|e| {
                log::warn!("Unreadable profile entry, enriching it as empty: {}", e);
                Profile::default()
            });
            clear_enrichment_fields(&mut profile);
            profile
        })
        .collect();

    log::info!(
        "Enriching {} profiles in {:?} mode",
        profiles.len(),
        enricher.mode()
    );
    let enriched = enricher.enrich(profiles).await;

    HttpResponse::Ok().json(EnrichResponse {
        success: true,
        count: enriched.len(),
        mode: enricher.mode(),
        email_stats: EmailStats::collect(&enriched),
        note: (enricher.mode() == EnrichmentMode::Demo).then_some(DEMO_NOTE),
        profiles: enriched,
    })
}
