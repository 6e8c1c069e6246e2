//! Integration specifications for the ranking pipeline, exercised through
//! the public service facade with deterministic collaborator stubs.

mod common {
    use std::collections::HashMap;
    use std::sync::Arc;

    use futures::future::BoxFuture;

    use care_compass::workflows::recommendation::{
        haversine_km, CapabilityProfile, ConditionCategory, ConditionCoverage, Coordinates,
        FacilityRecord, Geocoder, MemorySink, PreferenceVector, ProviderFailure, RankingConfig,
        RecommendationService, RouteEstimate, RoutePlanner, UserQuery,
    };

    pub(super) const ORIGIN: Coordinates = Coordinates {
        lat: 37.51,
        lng: 127.12,
    };

    pub(super) fn facility(name: &str, lat: f64, lng: f64) -> FacilityRecord {
        FacilityRecord {
            name: name.to_string(),
            department: "유방외과".to_string(),
            coverage: ConditionCoverage {
                breast: true,
                thyroid: false,
            },
            level: Some("의원".to_string()),
            address: Some(format!("서울시 어딘가 {name}")),
            phone: None,
            homepage: None,
            coordinates: Some(Coordinates { lat, lng }),
            availability: None,
            capabilities: CapabilityProfile::default(),
            breast_ultrasound_price: None,
            thyroid_ultrasound_price: None,
            referral_count: 0,
        }
    }

    pub(super) fn uniform_query(category: ConditionCategory) -> UserQuery {
        UserQuery {
            origin: ORIGIN,
            category,
            preferences: PreferenceVector::uniform(3),
            limit: None,
        }
    }

    pub(super) fn cost_only_query() -> UserQuery {
        let mut preferences = PreferenceVector::uniform(0);
        preferences.cost = 5;
        UserQuery {
            origin: ORIGIN,
            category: ConditionCategory::Breast,
            preferences,
            limit: None,
        }
    }

    /// Resolves only the addresses it was seeded with.
    #[derive(Default)]
    pub(super) struct StubGeocoder {
        results: HashMap<String, Coordinates>,
    }

    impl StubGeocoder {
        pub(super) fn with(address: &str, coordinates: Coordinates) -> Self {
            let mut results = HashMap::new();
            results.insert(address.to_string(), coordinates);
            Self { results }
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode<'a>(
            &'a self,
            address: &'a str,
        ) -> BoxFuture<'a, Result<Coordinates, ProviderFailure>> {
            Box::pin(async move {
                self.results
                    .get(address)
                    .copied()
                    .ok_or(ProviderFailure::NoResult)
            })
        }
    }

    /// Deterministic planner: scales the great-circle distance and fails
    /// outright for destinations on its outage list.
    #[derive(Default)]
    pub(super) struct StubRoutePlanner {
        outages: Vec<Coordinates>,
    }

    impl StubRoutePlanner {
        pub(super) fn failing_for(outages: Vec<Coordinates>) -> Self {
            Self { outages }
        }
    }

    impl RoutePlanner for StubRoutePlanner {
        fn route(
            &self,
            origin: Coordinates,
            destination: Coordinates,
        ) -> BoxFuture<'_, Result<RouteEstimate, ProviderFailure>> {
            let outage = self.outages.iter().any(|point| {
                (point.lat - destination.lat).abs() < 1e-12
                    && (point.lng - destination.lng).abs() < 1e-12
            });
            Box::pin(async move {
                if outage {
                    return Err(ProviderFailure::Lookup("simulated outage".to_string()));
                }
                let distance_km = haversine_km(origin, destination) * 1.2;
                Ok(RouteEstimate {
                    distance_km,
                    duration_min: distance_km * 2.0,
                })
            })
        }
    }

    pub(super) fn build_service<G, R>(
        geocoder: G,
        planner: R,
        sink: MemorySink,
    ) -> RecommendationService<G, R, MemorySink>
    where
        G: Geocoder + 'static,
        R: RoutePlanner + 'static,
    {
        RecommendationService::new(
            Arc::new(geocoder),
            Arc::new(planner),
            Arc::new(sink),
            RankingConfig::default(),
        )
    }
}

mod outcomes {
    use super::common::*;
    use care_compass::workflows::recommendation::{ConditionCategory, MemorySink, RankOutcome};

    #[tokio::test]
    async fn empty_input_yields_no_eligible_facilities() {
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            MemorySink::default(),
        );

        let outcome = service
            .rank(&[], &uniform_query(ConditionCategory::Breast))
            .await;
        assert_eq!(outcome, RankOutcome::NoEligibleFacilities);
        assert!(outcome.reason().is_some());
    }

    #[tokio::test]
    async fn all_zero_ratings_are_rejected_before_any_lookup() {
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            MemorySink::default(),
        );
        let facilities = vec![facility("의원", 37.52, 127.12)];
        let mut query = uniform_query(ConditionCategory::Breast);
        query.preferences = care_compass::workflows::recommendation::PreferenceVector::uniform(0);

        let outcome = service.rank(&facilities, &query).await;
        assert_eq!(outcome, RankOutcome::InvalidPreferences);
    }

    #[tokio::test]
    async fn category_mismatch_yields_no_eligible_facilities() {
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            MemorySink::default(),
        );
        let facilities = vec![facility("유방전문", 37.52, 127.12)];

        let outcome = service
            .rank(&facilities, &uniform_query(ConditionCategory::Thyroid))
            .await;
        assert_eq!(outcome, RankOutcome::NoEligibleFacilities);
    }
}

mod eligibility {
    use super::common::*;
    use care_compass::workflows::recommendation::{
        ConditionCategory, Coordinates, DataQualityEvent, MemorySink, RankOutcome,
    };

    #[tokio::test]
    async fn coordinate_less_facility_survives_through_geocoding() {
        let mut unplaced = facility("주소만있는의원", 0.0, 0.0);
        unplaced.coordinates = None;
        let address = unplaced.address.clone().expect("address present");
        let geocoder = StubGeocoder::with(
            &address,
            Coordinates {
                lat: 37.52,
                lng: 127.13,
            },
        );

        let service = build_service(geocoder, StubRoutePlanner::default(), MemorySink::default());
        let outcome = service
            .rank(
                &[unplaced],
                &uniform_query(ConditionCategory::Breast),
            )
            .await;

        match outcome {
            RankOutcome::Ranked(results) => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].facility.name, "주소만있는의원");
                assert!((results[0].facility.coordinates.lat - 37.52).abs() < 1e-9);
            }
            other => panic!("expected ranked outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unresolvable_address_drops_the_facility_with_a_diagnostic() {
        let mut unplaced = facility("미지의의원", 0.0, 0.0);
        unplaced.coordinates = None;
        let placed = facility("좌표있는의원", 37.52, 127.12);

        let sink = MemorySink::default();
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            sink.clone(),
        );
        let outcome = service
            .rank(
                &[unplaced, placed],
                &uniform_query(ConditionCategory::Breast),
            )
            .await;

        match outcome {
            RankOutcome::Ranked(results) => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].facility.name, "좌표있는의원");
            }
            other => panic!("expected ranked outcome, got {other:?}"),
        }

        let events = sink.events();
        assert!(events.iter().any(|event| matches!(
            event,
            DataQualityEvent::GeocodeUnresolved { facility, .. } if facility == "미지의의원"
        )));
    }
}

mod scoring_scenarios {
    use super::common::*;
    use care_compass::workflows::recommendation::{
        Criterion, DataQualityEvent, MemorySink, RankOutcome,
    };

    fn priced(name: &str, price: Option<u32>) -> care_compass::workflows::recommendation::FacilityRecord {
        let mut record = facility(name, 37.52, 127.12);
        record.breast_ultrasound_price = price;
        record
    }

    #[tokio::test]
    async fn cost_concentrated_weights_rank_strictly_by_ascending_price() {
        let facilities = vec![
            priced("중간가격", Some(50_000)),
            priced("고가", Some(70_000)),
            priced("저가", Some(30_000)),
        ];
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            MemorySink::default(),
        );

        let outcome = service.rank(&facilities, &cost_only_query()).await;
        match outcome {
            RankOutcome::Ranked(results) => {
                let names: Vec<&str> = results
                    .iter()
                    .map(|ranked| ranked.facility.name.as_str())
                    .collect();
                assert_eq!(names, vec!["저가", "중간가격", "고가"]);
            }
            other => panic!("expected ranked outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_price_is_imputed_with_the_cohort_median() {
        let facilities = vec![
            priced("저가", Some(40_000)),
            priced("고가", Some(60_000)),
            priced("가격미상", None),
        ];
        let sink = MemorySink::default();
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            sink.clone(),
        );

        let outcome = service.rank(&facilities, &cost_only_query()).await;
        let results = match outcome {
            RankOutcome::Ranked(results) => results,
            other => panic!("expected ranked outcome, got {other:?}"),
        };

        let unknown = results
            .iter()
            .find(|ranked| ranked.facility.name == "가격미상")
            .expect("imputed facility still ranked");
        let cost_component = unknown
            .components
            .iter()
            .find(|component| component.criterion == Criterion::Cost)
            .expect("cost component present");
        assert!((cost_component.score - 3.0).abs() < 1e-9);

        assert!(sink.events().iter().any(|event| matches!(
            event,
            DataQualityEvent::PriceImputed { facility, price_won }
                if facility == "가격미상" && (price_won - 50_000.0).abs() < 1e-9
        )));
    }

    #[tokio::test]
    async fn every_reported_score_stays_within_bounds() {
        let mut near = facility("가까운의원", 37.52, 127.13);
        near.capabilities.mammotome = true;
        near.capabilities.parking = true;
        near.availability = Some("평일 09-18 야간진료 주말진료".to_string());
        near.breast_ultrasound_price = Some(45_000);
        near.referral_count = 500;
        let far = facility("먼의원", 37.70, 127.30);

        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            MemorySink::default(),
        );
        let outcome = service
            .rank(
                &[near, far],
                &uniform_query(care_compass::workflows::recommendation::ConditionCategory::Breast),
            )
            .await;

        let results = match outcome {
            RankOutcome::Ranked(results) => results,
            other => panic!("expected ranked outcome, got {other:?}"),
        };
        for ranked in &results {
            for component in &ranked.components {
                assert!(
                    (1.0..=5.0).contains(&component.score),
                    "{} {:?} out of bounds: {}",
                    ranked.facility.name,
                    component.criterion,
                    component.score
                );
            }
        }
    }
}

mod routing_fallback {
    use super::common::*;
    use care_compass::workflows::recommendation::{
        ConditionCategory, Coordinates, DataQualityEvent, MemorySink, RankOutcome,
    };

    #[tokio::test]
    async fn failed_route_lookup_falls_back_to_straight_line_distance() {
        let reachable = facility("경로있는의원", 37.52, 127.13);
        let unreachable_point = Coordinates {
            lat: 37.53,
            lng: 127.14,
        };
        let unreachable = facility("경로없는의원", unreachable_point.lat, unreachable_point.lng);

        let sink = MemorySink::default();
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::failing_for(vec![unreachable_point]),
            sink.clone(),
        );

        let outcome = service
            .rank(
                &[reachable, unreachable],
                &uniform_query(ConditionCategory::Breast),
            )
            .await;
        let results = match outcome {
            RankOutcome::Ranked(results) => results,
            other => panic!("expected ranked outcome, got {other:?}"),
        };
        assert_eq!(results.len(), 2);

        let fallback = results
            .iter()
            .find(|ranked| ranked.facility.name == "경로없는의원")
            .expect("fallback facility still ranked");
        assert!(fallback.duration_min.is_none());

        let routed = results
            .iter()
            .find(|ranked| ranked.facility.name == "경로있는의원")
            .expect("routed facility ranked");
        assert!(routed.duration_min.is_some());

        assert!(sink.events().iter().any(|event| matches!(
            event,
            DataQualityEvent::RouteFallback { facility, .. } if facility == "경로없는의원"
        )));
    }
}

mod routing {
    use super::common::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use care_compass::workflows::recommendation::{
        recommendation_router, MemorySink, RankingConfig, RecommendationService,
    };

    fn build_router() -> axum::Router {
        let service = Arc::new(RecommendationService::new(
            Arc::new(StubGeocoder::default()),
            Arc::new(StubRoutePlanner::default()),
            Arc::new(MemorySink::default()),
            RankingConfig::default(),
        ));
        let facilities = Arc::new(vec![
            facility("제일가까운의원", 37.515, 127.121),
            facility("두번째의원", 37.53, 127.14),
        ]);
        recommendation_router(service, facilities)
    }

    fn query_json(rating: u8) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "origin": { "lat": 37.51, "lng": 127.12 },
            "category": "breast",
            "preferences": {
                "distance": rating,
                "hours": rating,
                "referral": rating,
                "cost": rating,
                "capability": rating,
                "parking": rating,
                "female_physician": rating
            }
        }))
        .expect("serialize query")
    }

    #[tokio::test]
    async fn post_recommendations_returns_a_ranked_payload() {
        let response = build_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/recommendations")
                    .header("content-type", "application/json")
                    .body(Body::from(query_json(3)))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("outcome"), Some(&json!("ranked")));
        let results = payload
            .get("results")
            .and_then(Value::as_array)
            .expect("results array");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].get("name"), Some(&json!("제일가까운의원")));
        assert!(results[0].get("components").is_some());
    }

    #[tokio::test]
    async fn zero_rated_query_maps_to_unprocessable_entity() {
        let response = build_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/recommendations")
                    .header("content-type", "application/json")
                    .body(Body::from(query_json(0)))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("outcome"), Some(&json!("invalid_preferences")));
    }
}

mod determinism {
    use super::common::*;
    use care_compass::workflows::recommendation::{ConditionCategory, MemorySink, RankOutcome};

    #[tokio::test]
    async fn identical_inputs_produce_byte_identical_output() {
        let facilities = vec![
            facility("첫째", 37.52, 127.13),
            facility("둘째", 37.53, 127.14),
            facility("셋째", 37.54, 127.15),
        ];
        let query = uniform_query(ConditionCategory::Breast);

        let mut payloads = Vec::new();
        for _ in 0..2 {
            let service = build_service(
                StubGeocoder::default(),
                StubRoutePlanner::default(),
                MemorySink::default(),
            );
            let outcome = service.rank(&facilities, &query).await;
            let results = match outcome {
                RankOutcome::Ranked(results) => results,
                other => panic!("expected ranked outcome, got {other:?}"),
            };
            payloads.push(serde_json::to_string(&results).expect("serialize results"));
        }

        assert_eq!(payloads[0], payloads[1]);
    }

    #[tokio::test]
    async fn equal_scores_break_ties_by_distance_then_input_order() {
        // Identical records at the same point score identically; the
        // stable sort must keep their input order.
        let facilities = vec![
            facility("동점-첫째", 37.52, 127.13),
            facility("동점-둘째", 37.52, 127.13),
        ];
        let service = build_service(
            StubGeocoder::default(),
            StubRoutePlanner::default(),
            MemorySink::default(),
        );

        let outcome = service
            .rank(&facilities, &uniform_query(ConditionCategory::Breast))
            .await;
        let results = match outcome {
            RankOutcome::Ranked(results) => results,
            other => panic!("expected ranked outcome, got {other:?}"),
        };
        let names: Vec<&str> = results
            .iter()
            .map(|ranked| ranked.facility.name.as_str())
            .collect();
        assert_eq!(names, vec!["동점-첫째", "동점-둘째"]);
    }
}
