use super::diagnostics::{DataQualityEvent, DiagnosticsSink};
use super::domain::{ConditionCategory, ConditionCoverage, Coordinates, FacilityRecord};
use super::providers::Geocoder;

/// Facility that matched the selector and has usable coordinates.
#[derive(Debug, Clone)]
pub(crate) struct EligibleFacility {
    pub(crate) record: FacilityRecord,
    pub(crate) coordinates: Coordinates,
}

/// The one category-matching policy for the whole engine: loose
/// OR-containment over normalized coverage. `Both` admits any facility
/// serving at least one of the two domains.
pub(crate) fn matches_category(coverage: ConditionCoverage, category: ConditionCategory) -> bool {
    match category {
        ConditionCategory::Breast => coverage.breast,
        ConditionCategory::Thyroid => coverage.thyroid,
        ConditionCategory::Both => coverage.breast || coverage.thyroid,
    }
}

/// Keep category matches, resolving missing coordinates through the
/// geocoder. A facility the geocoder cannot place is dropped from this
/// request only and reported through the sink.
pub(crate) async fn eligible_candidates<G, S>(
    geocoder: &G,
    sink: &S,
    facilities: &[FacilityRecord],
    category: ConditionCategory,
) -> Vec<EligibleFacility>
where
    G: Geocoder,
    S: DiagnosticsSink,
{
    let mut eligible = Vec::new();

    for record in facilities {
        if !matches_category(record.coverage, category) {
            continue;
        }

        if let Some(coordinates) = record.coordinates {
            eligible.push(EligibleFacility {
                record: record.clone(),
                coordinates,
            });
            continue;
        }

        let Some(address) = record.address.as_deref().filter(|a| !a.trim().is_empty()) else {
            sink.record(DataQualityEvent::GeocodeUnresolved {
                facility: record.name.clone(),
                detail: "no coordinates and no address on record".to_string(),
            });
            continue;
        };

        match geocoder.geocode(address).await {
            Ok(coordinates) => {
                let mut record = record.clone();
                record.coordinates = Some(coordinates);
                eligible.push(EligibleFacility {
                    record,
                    coordinates,
                });
            }
            Err(failure) => {
                sink.record(DataQualityEvent::GeocodeUnresolved {
                    facility: record.name.clone(),
                    detail: failure.to_string(),
                });
            }
        }
    }

    eligible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(breast: bool, thyroid: bool) -> ConditionCoverage {
        ConditionCoverage { breast, thyroid }
    }

    #[test]
    fn single_domain_selectors_require_their_domain() {
        assert!(matches_category(coverage(true, false), ConditionCategory::Breast));
        assert!(!matches_category(coverage(false, true), ConditionCategory::Breast));
        assert!(matches_category(coverage(false, true), ConditionCategory::Thyroid));
        assert!(!matches_category(coverage(true, false), ConditionCategory::Thyroid));
    }

    #[test]
    fn combined_selector_admits_either_domain_but_not_unrelated() {
        assert!(matches_category(coverage(true, false), ConditionCategory::Both));
        assert!(matches_category(coverage(false, true), ConditionCategory::Both));
        assert!(matches_category(coverage(true, true), ConditionCategory::Both));
        assert!(!matches_category(coverage(false, false), ConditionCategory::Both));
    }
}
