use crate::common::{external_base, mount_page, mount_probe, test_config};
use page_audit::analysis::{AnalysisError, FetchError, PageAnalyzer};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_internal_live_and_external_broken() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let gone = format!("{}/gone", external_base(&other));

    mount_page(
        &site,
        "/",
        &format!(
            r#"<!DOCTYPE html><html><head><title>Home</title></head><body>
                <h1>Welcome</h1>
                <a href="/live">Live</a>
                <a href="{}">Gone</a>
            </body></html>"#,
            gone
        ),
    )
    .await;
    mount_probe(&site, "/live", 200).await;
    mount_probe(&other, "/gone", 404).await;

    let analyzer = PageAnalyzer::from_config(&test_config(10, 5)).unwrap();
    let analysis = analyzer
        .analyze_page(&format!("{}/", site.uri()))
        .await
        .unwrap();

    assert_eq!(analysis.html_version, "HTML5");
    assert_eq!(analysis.page_title, "Home");
    assert_eq!(analysis.heading_counts.get(1), 1);
    assert_eq!(analysis.internal_link_count, 1);
    assert_eq!(analysis.external_link_count, 1);
    assert_eq!(analysis.broken_links, vec![gone]);
    assert!(!analysis.login_form_detected);
}

#[tokio::test]
async fn test_broken_links_keep_document_order() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(
        &site,
        "/",
        r#"<html><body>
            <a href="/slow-broken">1</a>
            <a href="/ok">2</a>
            <a href="/fast-broken">3</a>
            <a href="/slow-broken">4</a>
        </body></html>"#,
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/slow-broken"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(1500)))
        .mount(&site)
        .await;
    mount_probe(&site, "/ok", 204).await;
    mount_probe(&site, "/fast-broken", 410).await;

    let analyzer = PageAnalyzer::from_config(&test_config(10, 5)).unwrap();
    let analysis = analyzer.analyze_page(&format!("{}/", base)).await.unwrap();

    assert_eq!(analysis.internal_link_count, 4);
    assert_eq!(
        analysis.broken_links,
        vec![
            format!("{}/slow-broken", base),
            format!("{}/fast-broken", base),
            format!("{}/slow-broken", base),
        ]
    );
}

#[tokio::test]
async fn test_probe_timeout_marks_link_broken() {
    let site = MockServer::start().await;
    let base = site.uri();

    mount_page(&site, "/", r#"<a href="/hang">hang</a><a href="/fine">fine</a>"#).await;
    Mock::given(method("HEAD"))
        .and(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
        .mount(&site)
        .await;
    mount_probe(&site, "/fine", 200).await;

    let analyzer = PageAnalyzer::from_config(&test_config(10, 1)).unwrap();
    let analysis = analyzer.analyze_page(&format!("{}/", base)).await.unwrap();

    assert_eq!(analysis.broken_links, vec![format!("{}/hang", base)]);
}

#[tokio::test]
async fn test_script_links_skipped_and_login_form() {
    let site = MockServer::start().await;

    mount_page(
        &site,
        "/login",
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">
        <html><head><title>Sign in</title></head><body>
            <h2>Account</h2><h2>Help</h2>
            <form method="post"><input type="text" name="user"><input type="Password" name="pw"></form>
            <a href="javascript:void(0)">nothing</a>
            <a href="mailto:help@example.com">mail</a>
            <a href="">empty</a>
        </body></html>"#,
    )
    .await;

    let analyzer = PageAnalyzer::from_config(&test_config(10, 5)).unwrap();
    let analysis = analyzer
        .analyze_page(&format!("{}/login", site.uri()))
        .await
        .unwrap();

    assert_eq!(analysis.html_version, "HTML 4.01 Strict");
    assert_eq!(analysis.page_title, "Sign in");
    assert_eq!(analysis.heading_counts.as_array(), [0, 2, 0, 0, 0, 0]);
    assert_eq!(analysis.internal_link_count, 0);
    assert_eq!(analysis.external_link_count, 1);
    assert_eq!(analysis.broken_links, vec!["mailto:help@example.com"]);
    assert!(analysis.login_form_detected);
}

#[tokio::test]
async fn test_error_page_is_still_analyzed() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw("<html><head><title>Not Found</title></head></html>", "text/html"),
        )
        .mount(&site)
        .await;

    let analyzer = PageAnalyzer::from_config(&test_config(10, 5)).unwrap();
    let analysis = analyzer
        .analyze_page(&format!("{}/missing", site.uri()))
        .await
        .unwrap();

    assert_eq!(analysis.page_title, "Not Found");
}

#[tokio::test]
async fn test_non_html_is_parse_error() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&site)
        .await;

    let analyzer = PageAnalyzer::from_config(&test_config(10, 5)).unwrap();
    let result = analyzer
        .analyze_page(&format!("{}/data", site.uri()))
        .await;

    assert!(matches!(result, Err(AnalysisError::Parse(_))));
}

#[tokio::test]
async fn test_fetch_timeout_is_fetch_error() {
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

    let analyzer = PageAnalyzer::from_config(&test_config(1, 5)).unwrap();
    let result = analyzer
        .analyze_page(&format!("{}/slow", site.uri()))
        .await;

    assert!(matches!(
        result,
        Err(AnalysisError::Fetch(FetchError::Timeout { .. }))
    ));
}
