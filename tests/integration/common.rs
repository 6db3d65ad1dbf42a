use page_audit::config::{AnalyzerConfig, Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration with short timeouts for mock servers
pub fn test_config(fetch_timeout_secs: u64, probe_timeout_secs: u64) -> Config {
    Config {
        analyzer: AnalyzerConfig {
            fetch_timeout_secs,
            probe_timeout_secs,
            max_concurrent_probes: 4,
        },
        ..Default::default()
    }
}

/// Serves `html` as `text/html` for GET requests to `route`
pub async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

/// Answers HEAD requests to `route` with `status`
pub async fn mount_probe(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Base URL of `server` addressed by a host name other than its own URI
///
/// The mock server URI uses 127.0.0.1; links through `localhost` therefore
/// classify as external to pages served from that URI.
pub fn external_base(server: &MockServer) -> String {
    format!("http://localhost:{}", server.address().port())
}
