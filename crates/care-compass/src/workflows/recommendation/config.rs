use std::time::Duration;

/// Tunables for one ranking pipeline instance.
///
/// The referral ceiling is the historical dataset-wide maximum referral
/// volume; it is deliberately fixed rather than recomputed per cohort so
/// the popularity score stays comparable across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    /// Geographic cap on how many eligible facilities enter route lookup.
    pub candidate_cap: usize,
    /// Default length of the returned ranking.
    pub top_k: usize,
    /// Budget for each individual route lookup.
    pub route_timeout: Duration,
    /// Fixed upper bound for referral-count normalization.
    pub referral_ceiling: u32,
    /// Price assumed when an entire cohort lacks the active price column.
    pub fallback_price_won: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            candidate_cap: 10,
            top_k: 5,
            route_timeout: Duration::from_secs(3),
            referral_ceiling: 374,
            fallback_price_won: 100_000,
        }
    }
}
