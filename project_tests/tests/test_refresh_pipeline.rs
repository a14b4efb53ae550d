//! # Refresh Pipeline Integration Tests
//!
//! Drives the public `lib_countries` API end to end: stub HTTP feeds, the
//! HTTP source, the sync engine, the in-memory store, the render queue and the
//! PNG worker.

mod common;

use common::{rates_body, wakanda, Pipeline};
use lib_countries::{CountryStore, ListQuery, SyncError};
use serde_json::json;

#[tokio::test]
async fn wakanda_refresh_stores_and_renders() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_countries(json!([wakanda(1000)]));
    pipeline.feeds.set_rates(rates_body(&[("WAK", 10.0), ("USD", 1.0)]));

    let summary = pipeline.sync.refresh().await.unwrap();
    assert_eq!(summary.countries_processed, 1);

    let record = pipeline.query.get_by_name("WAKANDA").await.unwrap().unwrap();
    assert_eq!(record.currency_code.as_deref(), Some("WAK"));
    assert_eq!(record.exchange_rate, Some(10.0));
    assert!(
        (100_000.0..=200_000.0).contains(&record.estimated_gdp),
        "gdp {} out of range",
        record.estimated_gdp
    );
    assert_eq!(record.capital, "Birnin Zana");
    assert_eq!(record.last_refreshed_at, summary.refreshed_at);

    let png = pipeline.wait_for_artifact().await;
    assert!(png.len() > 8);
}

#[tokio::test]
async fn second_refresh_updates_population_without_duplicates() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_rates(rates_body(&[("WAK", 10.0)]));

    pipeline.feeds.set_countries(json!([wakanda(1000)]));
    let first = pipeline.sync.refresh().await.unwrap();

    pipeline.feeds.set_countries(json!([wakanda(2000)]));
    let second = pipeline.sync.refresh().await.unwrap();

    assert_eq!(pipeline.store.count().await.unwrap(), 1);
    let record = pipeline.query.get_by_name("wakanda").await.unwrap().unwrap();
    assert_eq!(record.population, 2000);
    assert!(second.refreshed_at >= first.refreshed_at);
    assert_eq!(record.last_refreshed_at, second.refreshed_at);
}

#[tokio::test]
async fn case_variants_in_one_feed_collapse_to_one_record() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_rates(rates_body(&[("WAK", 10.0)]));
    let mut shouted = wakanda(3000);
    shouted["name"] = json!("WAKANDA");
    pipeline.feeds.set_countries(json!([wakanda(1000), shouted]));

    let summary = pipeline.sync.refresh().await.unwrap();
    assert_eq!(summary.countries_processed, 2);
    assert_eq!(pipeline.store.count().await.unwrap(), 1);
    let record = pipeline.query.get_by_name("Wakanda").await.unwrap().unwrap();
    assert_eq!(record.population, 3000);
}

#[tokio::test]
async fn countries_missing_from_a_later_feed_are_kept() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_rates(rates_body(&[("WAK", 10.0)]));
    pipeline.feeds.set_countries(json!([
        wakanda(1000),
        {"name": "Genovia", "region": "Europe", "population": 30000, "currencies": []}
    ]));
    pipeline.sync.refresh().await.unwrap();

    pipeline.feeds.set_countries(json!([wakanda(1200)]));
    pipeline.sync.refresh().await.unwrap();

    let genovia = pipeline.query.get_by_name("genovia").await.unwrap().unwrap();
    assert_eq!(genovia.currency_code, None);
    assert_eq!(genovia.exchange_rate, None);
    assert_eq!(genovia.estimated_gdp, 0.0);
    assert_eq!(pipeline.store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn feed_outage_fails_refresh_without_writes() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_rates(rates_body(&[("WAK", 10.0)]));
    pipeline.feeds.set_countries(json!([wakanda(1000)]));
    pipeline.sync.refresh().await.unwrap();
    let before = pipeline.query.get_by_name("Wakanda").await.unwrap().unwrap();

    pipeline.feeds.take_countries_down();
    let err = pipeline.sync.refresh().await.unwrap_err();
    assert!(matches!(err, SyncError::SourceUnavailable(_)));

    let after = pipeline.query.get_by_name("Wakanda").await.unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn upstream_rates_error_is_source_unavailable() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_countries(json!([wakanda(1000)]));
    pipeline
        .feeds
        .set_rates(json!({"result": "error", "error-type": "unsupported-code"}));

    let err = pipeline.sync.refresh().await.unwrap_err();
    assert!(matches!(err, SyncError::SourceUnavailable(_)));
    assert_eq!(pipeline.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn list_delete_and_status_after_refresh() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_rates(rates_body(&[("AAA", 1.0), ("BBB", 1.0), ("CCC", 1.0)]));
    pipeline.feeds.set_countries(json!([
        {"name": "Small", "region": "Oceania", "population": 1, "currencies": [{"code": "AAA"}]},
        {"name": "Large", "region": "Oceania", "population": 1000000, "currencies": [{"code": "BBB"}]},
        {"name": "Medium", "region": "Asia", "population": 1000, "currencies": [{"code": "CCC"}]}
    ]));
    let summary = pipeline.sync.refresh().await.unwrap();

    let sorted = pipeline
        .query
        .list(&ListQuery {
            sort: Some("gdp_desc".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Large", "Medium", "Small"]);

    let oceania = pipeline
        .query
        .list(&ListQuery {
            region: Some("OCEANIA".into()),
            sort: Some("gdp_asc".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<_> = oceania.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Small", "Large"]);

    assert!(!pipeline.query.delete_by_name("Atlantis").await.unwrap());
    assert!(pipeline.query.delete_by_name("MEDIUM").await.unwrap());

    let status = pipeline.query.status().await.unwrap();
    assert_eq!(status.total_countries, 2);
    assert_eq!(status.last_refreshed_at, summary.refreshed_at);
}

#[tokio::test]
async fn worker_stops_on_shutdown_and_refresh_reports_closed_queue() {
    let pipeline = Pipeline::start().await;
    pipeline.feeds.set_rates(rates_body(&[("WAK", 10.0)]));
    pipeline.feeds.set_countries(json!([wakanda(1000)]));

    pipeline.shutdown.send(()).unwrap();
    tokio::time::timeout(std::time::Duration::from_secs(5), pipeline.worker)
        .await
        .expect("worker did not stop")
        .unwrap();

    let err = pipeline.sync.refresh().await.unwrap_err();
    assert!(matches!(err, SyncError::QueueClosed(_)));
    assert!(pipeline.cache.path().read_dir().unwrap().next().is_none());
}
