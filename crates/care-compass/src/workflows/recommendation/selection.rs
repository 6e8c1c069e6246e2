use super::domain::{Coordinates, FacilityRecord};
use super::eligibility::EligibleFacility;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Eligible facility annotated with its straight-line distance from the
/// patient's origin.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) record: FacilityRecord,
    pub(crate) coordinates: Coordinates,
    pub(crate) straight_line_km: f64,
}

/// Cap the working set to the `cap` nearest facilities. The sort is
/// stable, so ties at the cutoff keep their input order and the result is
/// reproducible.
pub(crate) fn nearest_candidates(
    origin: Coordinates,
    eligible: Vec<EligibleFacility>,
    cap: usize,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = eligible
        .into_iter()
        .map(|facility| {
            let straight_line_km = haversine_km(origin, facility.coordinates);
            Candidate {
                record: facility.record,
                coordinates: facility.coordinates,
                straight_line_km,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.straight_line_km
            .partial_cmp(&b.straight_line_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(cap);
    candidates
}
