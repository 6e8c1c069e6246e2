//! The recommendation pipeline: raw facility records and a weighted query
//! in, a deterministic ranked shortlist with per-criterion justification
//! out. External geocoding and routing sit behind the [`providers`] seams;
//! recovered data problems flow through the [`diagnostics`] sink instead of
//! failing the request.

mod config;
pub mod diagnostics;
pub mod domain;
pub(crate) mod eligibility;
pub(crate) mod metrics;
pub mod providers;
pub mod router;
pub(crate) mod scoring;
pub(crate) mod selection;
pub mod service;
pub mod weights;

pub use config::RankingConfig;
pub use diagnostics::{DataQualityEvent, DiagnosticsSink, MemorySink, NullSink, TracingSink};
pub use domain::{
    CapabilityProfile, ConditionCategory, ConditionCoverage, Coordinates, Criterion,
    FacilityRecord, FacilityView, PreferenceVector, RankedFacility, ScoreComponent, UserQuery,
};
pub use providers::{Geocoder, ProviderFailure, RouteEstimate, RoutePlanner};
pub use router::{recommendation_router, RankedFacilityView, RecommendationResponse};
pub use selection::haversine_km;
pub use service::{RankOutcome, RecommendationService};
pub use weights::{normalize as normalize_preferences, WeightVector};
