use std::sync::Arc;

use tracing::debug;

use super::config::RankingConfig;
use super::diagnostics::{DataQualityEvent, DiagnosticsSink};
use super::domain::{FacilityRecord, RankedFacility, UserQuery};
use super::providers::{Geocoder, RoutePlanner};
use super::scoring::ScoringEngine;
use super::weights::ScoredCandidate;
use super::{eligibility, metrics, selection, weights};

/// Result of one ranking request. The non-ranked variants are expected
/// outcomes the caller branches on, not failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    Ranked(Vec<RankedFacility>),
    NoEligibleFacilities,
    NoResolvableCandidates,
    InvalidPreferences,
}

impl RankOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            RankOutcome::Ranked(_) => "ranked",
            RankOutcome::NoEligibleFacilities => "no_eligible_facilities",
            RankOutcome::NoResolvableCandidates => "no_resolvable_candidates",
            RankOutcome::InvalidPreferences => "invalid_preferences",
        }
    }

    /// Human-readable explanation for the empty variants.
    pub const fn reason(&self) -> Option<&'static str> {
        match self {
            RankOutcome::Ranked(_) => None,
            RankOutcome::NoEligibleFacilities => {
                Some("no facility matches the requested condition category")
            }
            RankOutcome::NoResolvableCandidates => {
                Some("no candidate facility could be placed on the map from the available data")
            }
            RankOutcome::InvalidPreferences => {
                Some("preference ratings sum to zero; rate at least one criterion above zero")
            }
        }
    }
}

/// Facade composing the whole pipeline: eligibility, geographic capping,
/// route resolution, cohort statistics, scoring, and weighted aggregation.
/// One instance serves many independent requests; it holds no per-request
/// state.
pub struct RecommendationService<G, R, S> {
    geocoder: Arc<G>,
    routes: Arc<R>,
    diagnostics: Arc<S>,
    config: RankingConfig,
    engine: ScoringEngine,
}

impl<G, R, S> RecommendationService<G, R, S>
where
    G: Geocoder + 'static,
    R: RoutePlanner + 'static,
    S: DiagnosticsSink + 'static,
{
    pub fn new(
        geocoder: Arc<G>,
        routes: Arc<R>,
        diagnostics: Arc<S>,
        config: RankingConfig,
    ) -> Self {
        let engine = ScoringEngine::new(config.clone());
        Self {
            geocoder,
            routes,
            diagnostics,
            config,
            engine,
        }
    }

    /// Rank `facilities` for one query. The preference vector is validated
    /// before any collaborator call goes out, so an invalid request costs
    /// no external lookups.
    pub async fn rank(&self, facilities: &[FacilityRecord], query: &UserQuery) -> RankOutcome {
        let Some(weight_vector) = weights::normalize(&query.preferences) else {
            return RankOutcome::InvalidPreferences;
        };

        let eligible = eligibility::eligible_candidates(
            self.geocoder.as_ref(),
            self.diagnostics.as_ref(),
            facilities,
            query.category,
        )
        .await;
        if eligible.is_empty() {
            return RankOutcome::NoEligibleFacilities;
        }

        let candidates =
            selection::nearest_candidates(query.origin, eligible, self.config.candidate_cap);
        debug!(
            category = query.category.label(),
            candidates = candidates.len(),
            "candidate set selected"
        );

        let resolved = metrics::resolve_routes(
            self.routes.as_ref(),
            self.diagnostics.as_ref(),
            query.origin,
            candidates,
            self.config.route_timeout,
        )
        .await;
        if resolved.is_empty() {
            return RankOutcome::NoResolvableCandidates;
        }

        let stats = metrics::CohortStatistics::compute(
            &resolved,
            query.category,
            self.config.fallback_price_won,
        );

        let scored: Vec<ScoredCandidate> = resolved
            .into_iter()
            .map(|candidate| {
                let imputed_price = stats.imputed_price(&candidate.record, query.category);
                if metrics::active_price(&candidate.record, query.category).is_none() {
                    self.diagnostics.record(DataQualityEvent::PriceImputed {
                        facility: candidate.record.name.clone(),
                        price_won: imputed_price,
                    });
                }
                let components =
                    self.engine
                        .score(&candidate, imputed_price, query.category, &stats);
                ScoredCandidate {
                    candidate,
                    components,
                }
            })
            .collect();

        let limit = query.limit.unwrap_or(self.config.top_k);
        RankOutcome::Ranked(weights::rank_candidates(scored, &weight_vector, limit))
    }
}
