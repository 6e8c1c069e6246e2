use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;

use super::diagnostics::DiagnosticsSink;
use super::domain::{FacilityRecord, RankedFacility, ScoreComponent, UserQuery};
use super::providers::{Geocoder, RoutePlanner};
use super::service::{RankOutcome, RecommendationService};

/// Shared handler state: the stateless service plus the dataset loaded at
/// boot.
pub struct RouterState<G, R, S> {
    service: Arc<RecommendationService<G, R, S>>,
    facilities: Arc<Vec<FacilityRecord>>,
}

impl<G, R, S> Clone for RouterState<G, R, S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            facilities: self.facilities.clone(),
        }
    }
}

/// Router builder exposing the ranking endpoint.
pub fn recommendation_router<G, R, S>(
    service: Arc<RecommendationService<G, R, S>>,
    facilities: Arc<Vec<FacilityRecord>>,
) -> Router
where
    G: Geocoder + 'static,
    R: RoutePlanner + 'static,
    S: DiagnosticsSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/recommendations",
            post(recommend_handler::<G, R, S>),
        )
        .with_state(RouterState {
            service,
            facilities,
        })
}

/// Wire form of one ranked entry; the score is pre-rounded for display.
#[derive(Debug, Serialize)]
pub struct RankedFacilityView {
    pub rank: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    pub score: f64,
    pub components: Vec<ScoreComponent>,
}

impl From<RankedFacility> for RankedFacilityView {
    fn from(ranked: RankedFacility) -> Self {
        let score = ranked.display_score();
        Self {
            rank: ranked.rank,
            name: ranked.facility.name,
            level: ranked.facility.level,
            address: ranked.facility.address,
            phone: ranked.facility.phone,
            homepage: ranked.facility.homepage,
            lat: ranked.facility.coordinates.lat,
            lng: ranked.facility.coordinates.lng,
            distance_km: ranked.distance_km,
            duration_min: ranked.duration_min,
            score,
            components: ranked.components,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub results: Vec<RankedFacilityView>,
}

impl RecommendationResponse {
    fn from_outcome(outcome: RankOutcome) -> Self {
        let label = outcome.label();
        let reason = outcome.reason();
        let results = match outcome {
            RankOutcome::Ranked(ranked) => {
                ranked.into_iter().map(RankedFacilityView::from).collect()
            }
            _ => Vec::new(),
        };
        Self {
            outcome: label,
            reason,
            results,
        }
    }
}

pub(crate) async fn recommend_handler<G, R, S>(
    State(state): State<RouterState<G, R, S>>,
    axum::Json(query): axum::Json<UserQuery>,
) -> Response
where
    G: Geocoder + 'static,
    R: RoutePlanner + 'static,
    S: DiagnosticsSink + 'static,
{
    let outcome = state.service.rank(&state.facilities, &query).await;
    let status = match &outcome {
        RankOutcome::InvalidPreferences => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (
        status,
        axum::Json(RecommendationResponse::from_outcome(outcome)),
    )
        .into_response()
}
