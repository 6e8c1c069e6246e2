use serde::{Deserialize, Serialize};

/// WGS-84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Condition selector a patient picks when requesting a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Breast,
    Thyroid,
    Both,
}

impl ConditionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ConditionCategory::Breast => "breast",
            ConditionCategory::Thyroid => "thyroid",
            ConditionCategory::Both => "both",
        }
    }
}

/// Normalized form of the free-text department column, computed once at
/// intake so eligibility never re-parses raw strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionCoverage {
    pub breast: bool,
    pub thyroid: bool,
}

impl ConditionCoverage {
    /// Containment scan over the whitespace-stripped department text.
    pub fn from_department(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            breast: compact.contains("유방"),
            thyroid: compact.contains("갑상선"),
        }
    }
}

/// Strict booleans describing what a facility can actually do on site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    pub mammotome: bool,
    pub thyroid_rfa: bool,
    pub breast_biopsy: bool,
    pub thyroid_biopsy: bool,
    pub parking: bool,
    pub female_physician: bool,
}

/// One medical facility after normalization. Price fields use `None` for
/// "unknown", which is distinct from a legitimate zero price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub department: String,
    pub coverage: ConditionCoverage,
    pub level: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub homepage: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub availability: Option<String>,
    pub capabilities: CapabilityProfile,
    pub breast_ultrasound_price: Option<u32>,
    pub thyroid_ultrasound_price: Option<u32>,
    pub referral_count: u32,
}

/// Scored dimension, in the canonical pairing order used for weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Distance,
    Hours,
    Referral,
    Cost,
    Capability,
    Parking,
    FemalePhysician,
}

impl Criterion {
    pub const COUNT: usize = 7;

    pub const ALL: [Criterion; Criterion::COUNT] = [
        Criterion::Distance,
        Criterion::Hours,
        Criterion::Referral,
        Criterion::Cost,
        Criterion::Capability,
        Criterion::Parking,
        Criterion::FemalePhysician,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Distance => "distance",
            Criterion::Hours => "hours",
            Criterion::Referral => "referral",
            Criterion::Cost => "cost",
            Criterion::Capability => "capability",
            Criterion::Parking => "parking",
            Criterion::FemalePhysician => "female_physician",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Criterion::Distance => 0,
            Criterion::Hours => 1,
            Criterion::Referral => 2,
            Criterion::Cost => 3,
            Criterion::Capability => 4,
            Criterion::Parking => 5,
            Criterion::FemalePhysician => 6,
        }
    }
}

/// Importance ratings collected from the patient, one per criterion on a
/// 0-5 scale. A vector rating every criterion zero carries no signal and
/// is rejected by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceVector {
    pub distance: u8,
    pub hours: u8,
    pub referral: u8,
    pub cost: u8,
    pub capability: u8,
    pub parking: u8,
    pub female_physician: u8,
}

impl PreferenceVector {
    pub const fn uniform(rating: u8) -> Self {
        Self {
            distance: rating,
            hours: rating,
            referral: rating,
            cost: rating,
            capability: rating,
            parking: rating,
            female_physician: rating,
        }
    }

    /// Ratings in canonical [`Criterion::ALL`] order.
    pub const fn ratings(&self) -> [u8; Criterion::COUNT] {
        [
            self.distance,
            self.hours,
            self.referral,
            self.cost,
            self.capability,
            self.parking,
            self.female_physician,
        ]
    }
}

/// One ranking request. The origin is resolved by the caller; the engine
/// never geocodes the patient's own address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserQuery {
    pub origin: Coordinates,
    pub category: ConditionCategory,
    pub preferences: PreferenceVector,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Discrete contribution to a final score, kept so callers can show why a
/// facility ranked where it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub criterion: Criterion,
    pub score: f64,
    pub note: String,
}

/// Display fields for one ranked facility, including coordinates for map
/// markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityView {
    pub name: String,
    pub level: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub homepage: Option<String>,
    pub coordinates: Coordinates,
}

/// One entry of the ranked output. Immutable once constructed; the rank is
/// 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    pub rank: usize,
    pub facility: FacilityView,
    pub distance_km: f64,
    pub duration_min: Option<f64>,
    pub components: Vec<ScoreComponent>,
    pub total_score: f64,
}

impl RankedFacility {
    /// Two-decimal score for display. Sorting always uses the unrounded
    /// `total_score`.
    pub fn display_score(&self) -> f64 {
        (self.total_score * 100.0).round() / 100.0
    }
}
