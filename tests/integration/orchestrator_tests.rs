use crate::common::{mount_page, mount_probe, test_config};
use page_audit::storage::SharedStore;
use page_audit::{AuditError, JobStatus, Orchestrator, SqliteStore};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sqlite_store() -> SharedStore {
    Arc::new(Mutex::new(SqliteStore::new_in_memory().unwrap()))
}

#[tokio::test]
async fn test_submit_analyze_and_persist() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        r#"<!DOCTYPE html><title>Store me</title>
           <a href="/a">a</a><a href="/b">b</a>"#,
    )
    .await;
    mount_probe(&site, "/a", 200).await;

    let orchestrator = Orchestrator::from_config(&test_config(10, 5), sqlite_store()).unwrap();
    let queued = orchestrator.submit(&format!("{}/", base)).await.unwrap();
    assert_eq!(queued.status, JobStatus::Queued);

    orchestrator.drain().await;

    let job = orchestrator.get(queued.id).unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert!(job.error_detail.is_none());
    let analysis = job.result.unwrap();
    assert_eq!(analysis.page_title, "Store me");
    assert_eq!(analysis.internal_link_count, 2);
    assert_eq!(analysis.broken_links, vec![format!("{}/b", base)]);
}

#[tokio::test]
async fn test_fetch_failure_recorded_as_job_error() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<title>late</title>", "text/html")
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&site)
        .await;

    let orchestrator = Orchestrator::from_config(&test_config(1, 5), sqlite_store()).unwrap();
    let queued = orchestrator
        .submit(&format!("{}/slow", site.uri()))
        .await
        .unwrap();
    orchestrator.drain().await;

    let job = orchestrator.get(queued.id).unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert!(job.result.is_none());
    let detail = job.error_detail.unwrap();
    assert!(detail.starts_with("Fetch error"), "{}", detail);
}

#[tokio::test]
async fn test_reanalyze_replaces_result() {
    let site = MockServer::start().await;
    let url = format!("{}/page", site.uri());

    mount_page(&site, "/page", "<title>Before</title>").await;

    let orchestrator = Orchestrator::from_config(&test_config(10, 5), sqlite_store()).unwrap();
    let job = orchestrator.submit(&url).await.unwrap();
    orchestrator.drain().await;
    assert_eq!(
        orchestrator.get(job.id).unwrap().result.unwrap().page_title,
        "Before"
    );

    site.reset().await;
    mount_page(&site, "/page", "<title>After</title>").await;

    let reset = orchestrator.reanalyze(job.id).await.unwrap();
    assert_eq!(reset.id, job.id);
    assert_eq!(reset.status, JobStatus::Queued);
    assert!(reset.result.is_none());

    orchestrator.drain().await;
    let job = orchestrator.get(job.id).unwrap();
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.result.unwrap().page_title, "After");
}

#[tokio::test]
async fn test_delete_and_not_found() {
    let site = MockServer::start().await;
    mount_page(&site, "/", "<title>x</title>").await;

    let orchestrator = Orchestrator::from_config(&test_config(10, 5), sqlite_store()).unwrap();
    let job = orchestrator
        .submit(&format!("{}/", site.uri()))
        .await
        .unwrap();
    orchestrator.drain().await;

    orchestrator.delete(job.id).await.unwrap();
    orchestrator.delete(job.id).await.unwrap();

    assert!(matches!(orchestrator.get(job.id), Err(AuditError::NotFound(_))));
    assert!(matches!(
        orchestrator.reanalyze(job.id).await,
        Err(AuditError::NotFound(_))
    ));
    assert!(orchestrator.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_jobs_are_independent() {
    let site = MockServer::start().await;
    mount_page(&site, "/good", "<title>Good</title>").await;
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF", "application/pdf"))
        .mount(&site)
        .await;

    let orchestrator = Orchestrator::from_config(&test_config(10, 5), sqlite_store()).unwrap();
    let good = orchestrator
        .submit(&format!("{}/good", site.uri()))
        .await
        .unwrap();
    let bad = orchestrator
        .submit(&format!("{}/bad", site.uri()))
        .await
        .unwrap();
    orchestrator.drain().await;

    let jobs = orchestrator.list().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, good.id);
    assert_eq!(jobs[0].status, JobStatus::Done);
    assert_eq!(jobs[1].id, bad.id);
    assert_eq!(jobs[1].status, JobStatus::Error);
    assert!(jobs[1]
        .error_detail
        .as_deref()
        .unwrap()
        .starts_with("Parse error"));
}
