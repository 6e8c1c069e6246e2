use super::domain::{
    Criterion, FacilityView, PreferenceVector, RankedFacility, ScoreComponent,
};
use super::metrics::ResolvedCandidate;

/// Importance ratings normalized to sum to one, indexed in canonical
/// criterion order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector([f64; Criterion::COUNT]);

impl WeightVector {
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0[criterion.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// `weight_i = rating_i / Σ ratings`. Returns `None` for an all-zero
/// vector, which carries no signal to rank by.
pub fn normalize(preferences: &PreferenceVector) -> Option<WeightVector> {
    let ratings = preferences.ratings();
    let total: u32 = ratings.iter().map(|&rating| u32::from(rating)).sum();
    if total == 0 {
        return None;
    }

    let mut weights = [0.0; Criterion::COUNT];
    for (slot, &rating) in ratings.iter().enumerate() {
        weights[slot] = f64::from(rating) / f64::from(total);
    }
    Some(WeightVector(weights))
}

/// Candidate carrying its per-criterion scores, ready to aggregate.
#[derive(Debug, Clone)]
pub(crate) struct ScoredCandidate {
    pub(crate) candidate: ResolvedCandidate,
    pub(crate) components: Vec<ScoreComponent>,
}

fn weighted_total(components: &[ScoreComponent], weights: &WeightVector) -> f64 {
    components
        .iter()
        .map(|component| component.score * weights.get(component.criterion))
        .sum()
}

/// Aggregate, order, and truncate. Ordering is total score descending,
/// then distance ascending, then original candidate order (the sort is
/// stable), so identical inputs always produce identical output.
pub(crate) fn rank_candidates(
    scored: Vec<ScoredCandidate>,
    weights: &WeightVector,
    limit: usize,
) -> Vec<RankedFacility> {
    let mut totaled: Vec<(ScoredCandidate, f64)> = scored
        .into_iter()
        .map(|entry| {
            let total = weighted_total(&entry.components, weights);
            (entry, total)
        })
        .collect();

    totaled.sort_by(|(a, total_a), (b, total_b)| {
        total_b
            .partial_cmp(total_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.candidate
                    .distance_km
                    .partial_cmp(&b.candidate.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    totaled.truncate(limit);

    totaled
        .into_iter()
        .enumerate()
        .map(|(slot, (entry, total))| {
            let ResolvedCandidate {
                record,
                coordinates,
                distance_km,
                duration_min,
            } = entry.candidate;
            RankedFacility {
                rank: slot + 1,
                facility: FacilityView {
                    name: record.name,
                    level: record.level,
                    address: record.address,
                    phone: record.phone,
                    homepage: record.homepage,
                    coordinates,
                },
                distance_km,
                duration_min,
                components: entry.components,
                total_score: total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one_for_any_positive_vector() {
        let vectors = [
            PreferenceVector::uniform(3),
            PreferenceVector::uniform(1),
            PreferenceVector {
                distance: 5,
                hours: 0,
                referral: 1,
                cost: 4,
                capability: 2,
                parking: 0,
                female_physician: 3,
            },
        ];
        for preferences in vectors {
            let weights = normalize(&preferences).expect("positive vector normalizes");
            let sum: f64 = weights.as_slice().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
        }
    }

    #[test]
    fn all_zero_vector_is_rejected() {
        assert!(normalize(&PreferenceVector::uniform(0)).is_none());
    }

    #[test]
    fn single_rated_criterion_takes_the_whole_weight() {
        let mut preferences = PreferenceVector::uniform(0);
        preferences.cost = 4;
        let weights = normalize(&preferences).expect("valid vector");
        assert!((weights.get(Criterion::Cost) - 1.0).abs() < 1e-9);
        assert!(weights.get(Criterion::Distance).abs() < 1e-9);
    }
}
