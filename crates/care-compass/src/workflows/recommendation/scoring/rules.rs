use crate::workflows::recommendation::domain::{
    CapabilityProfile, ConditionCategory, Criterion, ScoreComponent,
};
use crate::workflows::recommendation::metrics::CohortStatistics;

const NIGHT_KEYWORD: &str = "야간";
const WEEKEND_KEYWORD: &str = "주말";
const WEEKDAY_KEYWORD: &str = "평일";

fn component(criterion: Criterion, score: f64, note: String) -> ScoreComponent {
    ScoreComponent {
        criterion,
        score,
        note,
    }
}

/// Closer facilities score higher against the cohort's distance range. A
/// degenerate cohort (every candidate equidistant) scores 5 across the
/// board rather than dividing by zero.
pub(crate) fn distance(distance_km: f64, stats: &CohortStatistics) -> ScoreComponent {
    let span = stats.distance_ceiling - stats.distance_floor;
    let (score, note) = if span.abs() < f64::EPSILON {
        (5.0, format!("{distance_km:.1} km, cohort equidistant"))
    } else {
        let score = 1.0 + 4.0 * (stats.distance_ceiling - distance_km) / span;
        (
            score,
            format!(
                "{:.1} km within cohort range {:.1} to {:.1} km",
                distance_km, stats.distance_floor, stats.distance_ceiling
            ),
        )
    };
    component(Criterion::Distance, score, note)
}

/// Extended-hours signal scanned from the availability text.
pub(crate) fn hours(availability: Option<&str>) -> ScoreComponent {
    let text = availability.unwrap_or_default().to_lowercase();
    let night = text.contains(NIGHT_KEYWORD);
    let weekend = text.contains(WEEKEND_KEYWORD);

    let (score, note) = if night && weekend {
        (5.0, "open nights and weekends".to_string())
    } else if weekend {
        (4.0, "open weekends".to_string())
    } else if night {
        (3.0, "open weekday nights".to_string())
    } else if text.contains(WEEKDAY_KEYWORD) {
        (2.0, "weekday hours only".to_string())
    } else {
        (1.0, "no extended-hours signal".to_string())
    };
    component(Criterion::Hours, score, note)
}

/// Referral volume normalized against the fixed historical ceiling, not a
/// per-cohort range.
pub(crate) fn referral(count: u32, ceiling: u32) -> ScoreComponent {
    let ceiling = ceiling.max(1);
    let normalized = (f64::from(count) / f64::from(ceiling)).clamp(0.0, 1.0);
    component(
        Criterion::Referral,
        1.0 + 4.0 * normalized,
        format!("{count} referrals against ceiling {ceiling}"),
    )
}

/// Cheaper facilities score higher against the cohort price range. A
/// cohort with one effective price is neutral at 3.
pub(crate) fn cost(imputed_price: f64, stats: &CohortStatistics) -> ScoreComponent {
    let span = stats.price_ceiling - stats.price_floor;
    let (score, note) = if span.abs() < f64::EPSILON {
        (3.0, "cohort priced uniformly".to_string())
    } else {
        let score = 1.0 + 4.0 * (stats.price_ceiling - imputed_price) / span;
        (
            score,
            format!(
                "{:.0} won within cohort range {:.0} to {:.0}",
                imputed_price, stats.price_floor, stats.price_ceiling
            ),
        )
    };
    component(Criterion::Cost, score, note)
}

/// Clinical depth for the requested condition: top-tier treatment beats
/// biopsy-only capability beats screening-only.
pub(crate) fn capability(
    capabilities: &CapabilityProfile,
    category: ConditionCategory,
) -> ScoreComponent {
    let (score, note) = match category {
        ConditionCategory::Breast => {
            if capabilities.mammotome {
                (5.0, "mammotome excision available".to_string())
            } else if capabilities.breast_biopsy {
                (4.0, "breast biopsy available".to_string())
            } else {
                (3.0, "screening only".to_string())
            }
        }
        ConditionCategory::Thyroid => {
            if capabilities.thyroid_rfa {
                (5.0, "thyroid RFA available".to_string())
            } else if capabilities.thyroid_biopsy {
                (4.0, "thyroid biopsy available".to_string())
            } else {
                (3.0, "screening only".to_string())
            }
        }
        ConditionCategory::Both => {
            if capabilities.mammotome && capabilities.thyroid_rfa {
                (5.0, "top-tier treatment for both conditions".to_string())
            } else if capabilities.mammotome || capabilities.thyroid_rfa {
                (4.0, "top-tier treatment for one condition".to_string())
            } else {
                (3.0, "screening only".to_string())
            }
        }
    };
    component(Criterion::Capability, score, note)
}

pub(crate) fn parking(available: bool) -> ScoreComponent {
    let (score, note) = if available {
        (5.0, "on-site parking".to_string())
    } else {
        (1.0, "no parking".to_string())
    };
    component(Criterion::Parking, score, note)
}

pub(crate) fn female_physician(present: bool) -> ScoreComponent {
    let (score, note) = if present {
        (5.0, "female physician on staff".to_string())
    } else {
        (1.0, "no female physician listed".to_string())
    };
    component(Criterion::FemalePhysician, score, note)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(distance: (f64, f64), price: (f64, f64)) -> CohortStatistics {
        CohortStatistics {
            distance_floor: distance.0,
            distance_ceiling: distance.1,
            price_floor: price.0,
            price_ceiling: price.1,
            price_median: (price.0 + price.1) / 2.0,
        }
    }

    #[test]
    fn distance_score_is_monotone_non_increasing() {
        let stats = stats((1.0, 9.0), (0.0, 0.0));
        let mut last = f64::INFINITY;
        for step in 0..=8 {
            let d = 1.0 + f64::from(step);
            let score = distance(d, &stats).score;
            assert!(score <= last + 1e-12, "score rose at {d} km");
            assert!((1.0..=5.0).contains(&score));
            last = score;
        }
    }

    #[test]
    fn equidistant_cohort_scores_five() {
        let stats = stats((2.5, 2.5), (0.0, 0.0));
        assert!((distance(2.5, &stats).score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn hours_ladder_matches_the_signal() {
        assert!((hours(Some("평일 09-18 야간진료 주말진료")).score - 5.0).abs() < 1e-9);
        assert!((hours(Some("주말진료 가능")).score - 4.0).abs() < 1e-9);
        assert!((hours(Some("야간진료")).score - 3.0).abs() < 1e-9);
        assert!((hours(Some("평일 09:00-18:00")).score - 2.0).abs() < 1e-9);
        assert!((hours(Some("문의 바람")).score - 1.0).abs() < 1e-9);
        assert!((hours(None).score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn referral_clamps_above_the_ceiling() {
        assert!((referral(0, 374).score - 1.0).abs() < 1e-9);
        assert!((referral(374, 374).score - 5.0).abs() < 1e-9);
        assert!((referral(500, 374).score - 5.0).abs() < 1e-9);
        let mid = referral(187, 374).score;
        assert!((mid - 3.0).abs() < 0.02, "got {mid}");
    }

    #[test]
    fn uniform_price_cohort_is_neutral() {
        let stats = stats((0.0, 0.0), (45_000.0, 45_000.0));
        assert!((cost(45_000.0, &stats).score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn cheaper_is_better_within_the_cohort() {
        let stats = stats((0.0, 0.0), (30_000.0, 70_000.0));
        assert!((cost(30_000.0, &stats).score - 5.0).abs() < 1e-9);
        assert!((cost(70_000.0, &stats).score - 1.0).abs() < 1e-9);
        assert!((cost(50_000.0, &stats).score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn capability_tiers_follow_the_treatment_ladder() {
        let mut caps = CapabilityProfile::default();
        assert!((capability(&caps, ConditionCategory::Breast).score - 3.0).abs() < 1e-9);
        caps.breast_biopsy = true;
        assert!((capability(&caps, ConditionCategory::Breast).score - 4.0).abs() < 1e-9);
        caps.mammotome = true;
        assert!((capability(&caps, ConditionCategory::Breast).score - 5.0).abs() < 1e-9);

        let mut caps = CapabilityProfile::default();
        caps.thyroid_biopsy = true;
        assert!((capability(&caps, ConditionCategory::Thyroid).score - 4.0).abs() < 1e-9);
        caps.thyroid_rfa = true;
        assert!((capability(&caps, ConditionCategory::Thyroid).score - 5.0).abs() < 1e-9);

        let mut caps = CapabilityProfile::default();
        assert!((capability(&caps, ConditionCategory::Both).score - 3.0).abs() < 1e-9);
        caps.mammotome = true;
        assert!((capability(&caps, ConditionCategory::Both).score - 4.0).abs() < 1e-9);
        caps.thyroid_rfa = true;
        assert!((capability(&caps, ConditionCategory::Both).score - 5.0).abs() < 1e-9);
    }

    #[test]
    fn binary_criteria_have_no_middle_ground() {
        assert!((parking(true).score - 5.0).abs() < 1e-9);
        assert!((parking(false).score - 1.0).abs() < 1e-9);
        assert!((female_physician(true).score - 5.0).abs() < 1e-9);
        assert!((female_physician(false).score - 1.0).abs() < 1e-9);
    }
}
