mod rules;

use super::config::RankingConfig;
use super::domain::{ConditionCategory, Criterion, ScoreComponent};
use super::metrics::{CohortStatistics, ResolvedCandidate};

/// Stateless scorer mapping a settled candidate onto the seven bounded
/// criterion scores, in canonical [`Criterion::ALL`] order.
pub(crate) struct ScoringEngine {
    config: RankingConfig,
}

impl ScoringEngine {
    pub(crate) fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub(crate) fn score(
        &self,
        candidate: &ResolvedCandidate,
        imputed_price: f64,
        category: ConditionCategory,
        stats: &CohortStatistics,
    ) -> Vec<ScoreComponent> {
        let capabilities = &candidate.record.capabilities;
        let components = vec![
            rules::distance(candidate.distance_km, stats),
            rules::hours(candidate.record.availability.as_deref()),
            rules::referral(candidate.record.referral_count, self.config.referral_ceiling),
            rules::cost(imputed_price, stats),
            rules::capability(capabilities, category),
            rules::parking(capabilities.parking),
            rules::female_physician(capabilities.female_physician),
        ];

        debug_assert!(components
            .iter()
            .zip(Criterion::ALL)
            .all(|(component, criterion)| component.criterion == criterion));
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::recommendation::domain::{
        CapabilityProfile, ConditionCoverage, Coordinates, FacilityRecord,
    };

    fn candidate(distance_km: f64) -> ResolvedCandidate {
        ResolvedCandidate {
            record: FacilityRecord {
                name: "검진의원".to_string(),
                department: "유방외과".to_string(),
                coverage: ConditionCoverage {
                    breast: true,
                    thyroid: false,
                },
                level: None,
                address: None,
                phone: None,
                homepage: None,
                coordinates: None,
                availability: Some("평일 09-18, 야간진료".to_string()),
                capabilities: CapabilityProfile {
                    mammotome: true,
                    parking: true,
                    ..CapabilityProfile::default()
                },
                breast_ultrasound_price: Some(50_000),
                thyroid_ultrasound_price: None,
                referral_count: 187,
            },
            coordinates: Coordinates { lat: 37.5, lng: 127.0 },
            distance_km,
            duration_min: Some(12.0),
        }
    }

    fn stats() -> CohortStatistics {
        CohortStatistics {
            distance_floor: 1.0,
            distance_ceiling: 5.0,
            price_floor: 30_000.0,
            price_ceiling: 70_000.0,
            price_median: 50_000.0,
        }
    }

    #[test]
    fn every_component_stays_within_bounds() {
        let engine = ScoringEngine::new(RankingConfig::default());
        let candidate = candidate(3.0);
        let components = engine.score(&candidate, 50_000.0, ConditionCategory::Breast, &stats());

        assert_eq!(components.len(), Criterion::COUNT);
        for component in &components {
            assert!(
                (1.0..=5.0).contains(&component.score),
                "{:?} out of bounds: {}",
                component.criterion,
                component.score
            );
        }
    }

    #[test]
    fn components_come_back_in_canonical_order() {
        let engine = ScoringEngine::new(RankingConfig::default());
        let candidate = candidate(2.0);
        let components = engine.score(&candidate, 50_000.0, ConditionCategory::Breast, &stats());
        let criteria: Vec<Criterion> = components.iter().map(|c| c.criterion).collect();
        assert_eq!(criteria, Criterion::ALL.to_vec());
    }
}
