//! Integration tests across repos:
//! - Seeded dataset feeding every dashboard report
//! - Observation lifecycle with its audit trail
//! - Predictor input from stored observations
//! - Concurrent writers on one service
//! - On-disk persistence

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

use lx_core::audit_detail::ObservationDetail;
use lx_core::enums::{AuditAction, EntityType, Trend};
use lx_core::trend::{PredictError, predict};
use lx_db::error::DatabaseError;
use lx_db::repos::audit::AuditFilter;
use lx_db::repos::geography::NewCountry;
use lx_db::seed::{SEED_YEARS, seed_demo};
use lx_db::service::LxService;

async fn seeded() -> LxService {
    let svc = LxService::new_local(":memory:").await.unwrap();
    seed_demo(&svc).await.unwrap();
    svc
}

async fn country_id(svc: &LxService, name: &str) -> i64 {
    svc.find_country_by_name(name).await.unwrap().unwrap().id
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[rstest]
#[case(2000)]
#[case(2010)]
#[case(2020)]
#[tokio::test]
async fn every_seed_year_has_a_ranking(#[case] year: i32) {
    let svc = seeded().await;
    let western_europe = svc
        .list_sub_regions()
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.name == "Western Europe")
        .unwrap();

    let ranking = svc.sub_region_ranking(western_europe.id, year).await.unwrap();
    let names: Vec<&str> = ranking.iter().map(|r| r.country_name.as_str()).collect();
    // Germany trails France in every seeded year
    assert_eq!(names, vec!["Germany", "France"]);
}

#[tokio::test]
async fn ranking_for_year_without_data_is_empty() {
    let svc = seeded().await;
    let sub_region = svc.list_sub_regions().await.unwrap().remove(0);
    assert!(svc.sub_region_ranking(sub_region.id, 1950).await.unwrap().is_empty());
}

#[tokio::test]
async fn region_average_matches_manual_mean() {
    let svc = seeded().await;
    let europe = svc
        .list_regions()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.name == "Europe")
        .unwrap();

    let averages = svc.region_averages(europe.id, 2020).await.unwrap();
    assert_eq!(averages.len(), 1);
    assert_eq!(averages[0].sub_region_name, "Western Europe");
    assert!((averages[0].average_le - (81.0 + 82.2) / 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn years_list_descending_after_seed() {
    let svc = seeded().await;
    let mut expected = SEED_YEARS.to_vec();
    expected.reverse();
    assert_eq!(svc.list_years().await.unwrap(), expected);
}

// ---------------------------------------------------------------------------
// Observation lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lifecycle_leaves_three_audit_entries() {
    let svc = LxService::new_local(":memory:").await.unwrap();
    let country = svc
        .create_country(&NewCountry {
            name: "Uruguay".into(),
            alpha3: Some("URY".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    svc.create_observation(country.id, 2021, 75.4).await.unwrap();
    svc.update_observation(country.id, 2021, 75.9).await.unwrap();
    svc.delete_observation(country.id, 2021).await.unwrap();

    let trail = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::Observation),
            entity_id: Some(format!("{}:2021", country.id)),
            ..Default::default()
        })
        .await
        .unwrap();
    let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Deleted, AuditAction::Updated, AuditAction::Created]
    );

    let deleted: ObservationDetail = serde_json::from_value(trail[0].detail.clone().unwrap()).unwrap();
    assert_eq!(
        deleted,
        ObservationDetail {
            country_id: country.id,
            year: 2021,
            previous_value: Some(75.9),
            new_value: None,
        }
    );
}

#[tokio::test]
async fn rejected_mutations_are_user_errors() {
    let svc = seeded().await;
    let chile = country_id(&svc, "Chile").await;

    let dup = svc.create_observation(chile, 2020, 80.0).await.unwrap_err();
    let missing = svc.update_observation(chile, 1999, 70.0).await.unwrap_err();
    let invalid = svc.create_observation(chile, 2024, f64::NAN).await.unwrap_err();

    for err in [&dup, &missing, &invalid] {
        assert!(err.is_user_error(), "{err}");
    }
    assert!(matches!(dup, DatabaseError::AlreadyExists { .. }));
    assert!(dup.to_string().contains("already exists"));
    assert!(missing.to_string().contains("not found"));
}

// ---------------------------------------------------------------------------
// Predictor over stored data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn predicts_from_stored_series() {
    let svc = seeded().await;
    let japan = country_id(&svc, "Japan").await;

    let series = svc.prediction_series(japan).await.unwrap();
    assert_eq!(series.len(), SEED_YEARS.len());

    let fit = predict(&series, 2030).unwrap();
    assert_eq!(fit.trend, Trend::Improving);
    assert!(fit.predicted_value > 84.6);
}

#[tokio::test]
async fn stored_future_year_blocks_prediction() {
    let svc = seeded().await;
    let kenya = country_id(&svc, "Kenya").await;
    svc.create_observation(kenya, 2030, 66.0).await.unwrap();

    let series = svc.prediction_series(kenya).await.unwrap();
    let err = predict(&series, 2030).unwrap_err();
    assert!(matches!(err, PredictError::FutureDataExists { .. }));
}

#[tokio::test]
async fn single_observation_is_insufficient() {
    let svc = LxService::new_local(":memory:").await.unwrap();
    let country = svc
        .create_country(&NewCountry {
            name: "Tuvalu".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    svc.create_observation(country.id, 2015, 65.0).await.unwrap();

    let series = svc.prediction_series(country.id).await.unwrap();
    assert!(matches!(
        predict(&series, 2030),
        Err(PredictError::InsufficientData { found: 1 })
    ));
}

// ---------------------------------------------------------------------------
// Concurrency and persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_creates_all_commit() {
    let svc = Arc::new(LxService::new_local(":memory:").await.unwrap());
    let country = svc
        .create_country(&NewCountry {
            name: "Iceland".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for year in 1990..2010 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.create_observation(country.id, year, 78.0).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(svc.list_observations(country.id).await.unwrap().len(), 20);
    let audit = svc
        .query_audit(&AuditFilter {
            entity_type: Some(EntityType::Observation),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(audit.len(), 20);
}

#[tokio::test]
async fn concurrent_updates_report_the_value_they_replaced() {
    let svc = Arc::new(LxService::new_local(":memory:").await.unwrap());
    let country = svc
        .create_country(&NewCountry {
            name: "Malta".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    svc.create_observation(country.id, 2000, 70.0).await.unwrap();

    let mut handles = Vec::new();
    for step in 1..=10 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.update_observation(country.id, 2000, 70.0 + f64::from(step)).await
        }));
    }
    let mut updates = Vec::new();
    for handle in handles {
        updates.push(handle.await.unwrap().unwrap());
    }

    let audited: Vec<(Option<f64>, Option<f64>)> = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::Updated),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_iter()
        .map(|e| {
            let detail: ObservationDetail = serde_json::from_value(e.detail.unwrap()).unwrap();
            (detail.previous_value, detail.new_value)
        })
        .collect();
    assert_eq!(audited.len(), 10);
    for update in &updates {
        let pair = (Some(update.previous_value), Some(update.current.value));
        assert!(audited.contains(&pair), "{pair:?} missing from {audited:?}");
    }

    // Each update replaced a different value, so together they form one chain
    let mut previous: Vec<f64> = updates.iter().map(|u| u.previous_value).collect();
    previous.sort_by(f64::total_cmp);
    previous.dedup();
    assert_eq!(previous.len(), 10);
}

#[tokio::test]
async fn seeded_file_database_reopens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lifex.db");
    let path = path.to_str().unwrap();

    {
        let svc = LxService::new_local(path).await.unwrap();
        seed_demo(&svc).await.unwrap();
    }

    let svc = LxService::new_local(path).await.unwrap();
    assert!(seed_demo(&svc).await.unwrap().is_empty());
    assert_eq!(
        svc.count(EntityType::Country).await.unwrap(),
        svc.list_countries().await.unwrap().len() as u64
    );
}
