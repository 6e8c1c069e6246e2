use super::parser::SheetRow;
use super::MalformedRecord;
use crate::workflows::recommendation::domain::{
    CapabilityProfile, ConditionCoverage, Coordinates, FacilityRecord,
};

/// Truthy spellings observed in the upstream sheet. Anything else,
/// including blank, resolves to false; coercion never errors because the
/// feed is known to be inconsistent.
const TRUTHY: [&str; 6] = ["y", "yes", "true", "1", "가능", "있음"];

pub(crate) fn parse_flag(raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    let normalized = raw.trim().to_lowercase();
    if TRUTHY.contains(&normalized.as_str()) {
        return true;
    }
    normalized
        .parse::<f64>()
        .map(|value| value != 0.0)
        .unwrap_or(false)
}

/// Strip everything but digits and parse. Zero surviving digits means the
/// price is unknown; an actual zero price survives as `Some(0)`.
pub(crate) fn parse_price(raw: Option<&str>) -> Option<u32> {
    let digits: String = raw?.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Finite floating-point degrees or nothing.
pub(crate) fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let value: f64 = raw?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Leading integer digits, `0` when absent or non-numeric.
pub(crate) fn parse_count(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

pub(crate) fn normalize_row(row: SheetRow, row_number: usize) -> Result<FacilityRecord, MalformedRecord> {
    let name = match row.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(MalformedRecord {
                row: row_number,
                field: "병원명",
            })
        }
    };

    let coordinates = match (
        parse_coordinate(row.lat.as_deref()),
        parse_coordinate(row.lng.as_deref()),
    ) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };

    let department = row.department.unwrap_or_default();

    Ok(FacilityRecord {
        coverage: ConditionCoverage::from_department(&department),
        name,
        department,
        level: row.level,
        address: row.address,
        phone: row.phone,
        homepage: row.homepage,
        coordinates,
        availability: row.availability,
        capabilities: CapabilityProfile {
            mammotome: parse_flag(row.mammotome.as_deref()),
            thyroid_rfa: parse_flag(row.thyroid_rfa.as_deref()),
            breast_biopsy: parse_flag(row.breast_biopsy.as_deref()),
            thyroid_biopsy: parse_flag(row.thyroid_biopsy.as_deref()),
            parking: parse_flag(row.parking.as_deref()),
            female_physician: parse_flag(row.female_physician.as_deref()),
        },
        breast_ultrasound_price: parse_price(row.breast_ultrasound_price.as_deref()),
        thyroid_ultrasound_price: parse_price(row.thyroid_ultrasound_price.as_deref()),
        referral_count: parse_count(row.referral_count.as_deref()),
    })
}
