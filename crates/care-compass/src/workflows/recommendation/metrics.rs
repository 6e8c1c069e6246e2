use std::time::Duration;

use futures::future::join_all;

use super::diagnostics::{DataQualityEvent, DiagnosticsSink};
use super::domain::{ConditionCategory, Coordinates, FacilityRecord};
use super::providers::RoutePlanner;
use super::selection::Candidate;

/// Candidate whose distance has settled, by route lookup or by fallback to
/// the straight-line figure. `duration_min` stays `None` on fallback.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCandidate {
    pub(crate) record: FacilityRecord,
    pub(crate) coordinates: Coordinates,
    pub(crate) distance_km: f64,
    pub(crate) duration_min: Option<f64>,
}

/// Fan out one route lookup per candidate, each under its own timeout, and
/// join the results before anything downstream runs. `join_all` keeps the
/// candidate order, so completion order never influences the output.
pub(crate) async fn resolve_routes<R, S>(
    planner: &R,
    sink: &S,
    origin: Coordinates,
    candidates: Vec<Candidate>,
    timeout: Duration,
) -> Vec<ResolvedCandidate>
where
    R: RoutePlanner,
    S: DiagnosticsSink,
{
    let lookups = candidates
        .iter()
        .map(|candidate| tokio::time::timeout(timeout, planner.route(origin, candidate.coordinates)));
    let outcomes = join_all(lookups).await;

    let mut resolved = Vec::with_capacity(candidates.len());
    for (candidate, outcome) in candidates.into_iter().zip(outcomes) {
        let estimate = match outcome {
            Ok(Ok(estimate)) if estimate.distance_km.is_finite() && estimate.distance_km >= 0.0 => {
                Some(estimate)
            }
            Ok(Ok(estimate)) => {
                sink.record(DataQualityEvent::RouteFallback {
                    facility: candidate.record.name.clone(),
                    detail: format!("provider returned unusable distance {}", estimate.distance_km),
                });
                None
            }
            Ok(Err(failure)) => {
                sink.record(DataQualityEvent::RouteFallback {
                    facility: candidate.record.name.clone(),
                    detail: failure.to_string(),
                });
                None
            }
            Err(_elapsed) => {
                sink.record(DataQualityEvent::RouteFallback {
                    facility: candidate.record.name.clone(),
                    detail: format!("route lookup timed out after {}ms", timeout.as_millis()),
                });
                None
            }
        };

        match estimate {
            Some(estimate) => resolved.push(ResolvedCandidate {
                record: candidate.record,
                coordinates: candidate.coordinates,
                distance_km: estimate.distance_km,
                duration_min: estimate.duration_min.is_finite().then_some(estimate.duration_min),
            }),
            None if candidate.straight_line_km.is_finite() => resolved.push(ResolvedCandidate {
                record: candidate.record,
                coordinates: candidate.coordinates,
                distance_km: candidate.straight_line_km,
                duration_min: None,
            }),
            None => {
                sink.record(DataQualityEvent::RouteUnresolved {
                    facility: candidate.record.name.clone(),
                    detail: "no route and no usable straight-line distance".to_string(),
                });
            }
        }
    }

    resolved
}

/// The price column that applies to the active selector. For the combined
/// selector the larger of the two known prices stands in, pricing a visit
/// by its costlier exam.
pub(crate) fn active_price(record: &FacilityRecord, category: ConditionCategory) -> Option<u32> {
    match category {
        ConditionCategory::Breast => record.breast_ultrasound_price,
        ConditionCategory::Thyroid => record.thyroid_ultrasound_price,
        ConditionCategory::Both => match (
            record.breast_ultrasound_price,
            record.thyroid_ultrasound_price,
        ) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        },
    }
}

/// Cohort-relative normalization baselines, computed once after every
/// candidate has settled so all of them score against the same figures.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CohortStatistics {
    pub(crate) distance_floor: f64,
    pub(crate) distance_ceiling: f64,
    pub(crate) price_floor: f64,
    pub(crate) price_ceiling: f64,
    pub(crate) price_median: f64,
}

impl CohortStatistics {
    pub(crate) fn compute(
        resolved: &[ResolvedCandidate],
        category: ConditionCategory,
        fallback_price_won: u32,
    ) -> Self {
        let mut distance_floor = f64::INFINITY;
        let mut distance_ceiling = f64::NEG_INFINITY;
        for candidate in resolved {
            distance_floor = distance_floor.min(candidate.distance_km);
            distance_ceiling = distance_ceiling.max(candidate.distance_km);
        }

        let mut known_prices: Vec<u32> = resolved
            .iter()
            .filter_map(|candidate| active_price(&candidate.record, category))
            .collect();
        known_prices.sort_unstable();

        let (price_floor, price_ceiling, price_median) = if known_prices.is_empty() {
            let fallback = f64::from(fallback_price_won);
            (fallback, fallback, fallback)
        } else {
            let floor = f64::from(known_prices[0]);
            let ceiling = f64::from(known_prices[known_prices.len() - 1]);
            let mid = known_prices.len() / 2;
            let median = if known_prices.len() % 2 == 1 {
                f64::from(known_prices[mid])
            } else {
                (f64::from(known_prices[mid - 1]) + f64::from(known_prices[mid])) / 2.0
            };
            (floor, ceiling, median)
        };

        Self {
            distance_floor,
            distance_ceiling,
            price_floor,
            price_ceiling,
            price_median,
        }
    }

    /// A candidate's own price, or the cohort median when it is unknown.
    pub(crate) fn imputed_price(
        &self,
        record: &FacilityRecord,
        category: ConditionCategory,
    ) -> f64 {
        match active_price(record, category) {
            Some(price) => f64::from(price),
            None => self.price_median,
        }
    }
}
