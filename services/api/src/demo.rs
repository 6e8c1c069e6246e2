use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::infra::{UnconfiguredGeocoder, UnconfiguredRoutePlanner};
use care_compass::error::AppError;
use care_compass::workflows::intake::SheetImporter;
use care_compass::workflows::recommendation::{
    ConditionCategory, Coordinates, MemorySink, PreferenceVector, RankOutcome, RankingConfig,
    RecommendationService, UserQuery,
};

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Facility sheet CSV to rank against
    #[arg(long)]
    pub(crate) sheet: PathBuf,
    /// Origin latitude in decimal degrees
    #[arg(long)]
    pub(crate) lat: f64,
    /// Origin longitude in decimal degrees
    #[arg(long)]
    pub(crate) lng: f64,
    /// Condition category to match
    #[arg(long, value_enum)]
    pub(crate) category: CategoryArg,
    /// How many facilities to include in the ranking
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Importance of proximity (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) distance: u8,
    /// Importance of evening/weekend hours (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) hours: u8,
    /// Importance of referral volume (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) referral: u8,
    /// Importance of ultrasound cost (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) cost: u8,
    /// Importance of on-site treatment capability (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) capability: u8,
    /// Importance of parking (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) parking: u8,
    /// Importance of a female physician (0-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) female_physician: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum CategoryArg {
    Breast,
    Thyroid,
    Both,
}

impl From<CategoryArg> for ConditionCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Breast => ConditionCategory::Breast,
            CategoryArg::Thyroid => ConditionCategory::Thyroid,
            CategoryArg::Both => ConditionCategory::Both,
        }
    }
}

pub(crate) async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let import = SheetImporter::from_path(&args.sheet)?;
    println!(
        "Loaded {} facilities from {} ({} rows skipped)",
        import.facilities.len(),
        args.sheet.display(),
        import.issues.len()
    );

    let sink = Arc::new(MemorySink::default());
    let service = RecommendationService::new(
        Arc::new(UnconfiguredGeocoder),
        Arc::new(UnconfiguredRoutePlanner),
        sink.clone(),
        RankingConfig::default(),
    );

    let category = ConditionCategory::from(args.category);
    let query = UserQuery {
        origin: Coordinates {
            lat: args.lat,
            lng: args.lng,
        },
        category,
        preferences: PreferenceVector {
            distance: args.distance,
            hours: args.hours,
            referral: args.referral,
            cost: args.cost,
            capability: args.capability,
            parking: args.parking,
            female_physician: args.female_physician,
        },
        limit: args.limit,
    };

    println!(
        "Origin {:.4}, {:.4} | category {}",
        args.lat,
        args.lng,
        category.label()
    );

    match service.rank(&import.facilities, &query).await {
        RankOutcome::Ranked(results) => {
            println!("\nRecommended facilities");
            for ranked in &results {
                println!(
                    "{}. {} (score {:.2})",
                    ranked.rank,
                    ranked.facility.name,
                    ranked.display_score()
                );
                match ranked.duration_min {
                    Some(duration) => {
                        println!("   {:.1} km, about {:.0} min", ranked.distance_km, duration)
                    }
                    None => println!("   {:.1} km (straight-line)", ranked.distance_km),
                }
                if let Some(address) = &ranked.facility.address {
                    println!("   {address}");
                }
                if let Some(phone) = &ranked.facility.phone {
                    println!("   {phone}");
                }
                for component in &ranked.components {
                    println!(
                        "   - {}: {:.2} ({})",
                        component.criterion.label(),
                        component.score,
                        component.note
                    );
                }
            }
        }
        other => {
            let reason = other.reason().unwrap_or("no result");
            println!("\nNo ranking produced: {reason}");
        }
    }

    let events = sink.events();
    if !events.is_empty() {
        println!("\nData quality notes");
        for event in events {
            println!("- {event}");
        }
    }

    Ok(())
}
