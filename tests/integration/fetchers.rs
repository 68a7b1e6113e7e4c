//! Integration tests for the provided fetchers
//!
//! `HttpFetcher` runs against a `wiremock` server, `DirFetcher` against a
//! `tempfile` directory that is removed when the test ends.

use crate::common::*;
use hashnav::loader::{DirFetcher, PageFetcher};
use hashnav::*;
use tempfile::TempDir;
use tokio::task::LocalSet;

// ============================================================================
// HttpFetcher
// ============================================================================

#[cfg(feature = "http")]
mod http {
    use super::*;
    use hashnav::loader::HttpFetcher;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn serve(server: &MockServer, page: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/pages/{page}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetches_relative_to_base_url() {
        let server = MockServer::start().await;
        serve(&server, "world.html", WORLD_HTML).await;

        let fetcher = HttpFetcher::new(format!("{}/pages/", server.uri()));
        assert_eq!(
            fetcher.resolve("world.html"),
            format!("{}/pages/world.html", server.uri())
        );

        let body = fetcher.fetch("world.html").await.unwrap();
        assert_eq!(body, WORLD_HTML);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pages/broken.html"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(format!("{}/pages", server.uri()));

        let err = fetcher.fetch("broken.html").await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(err.to_string(), "GET broken.html returned HTTP 503");

        // Unmatched requests get wiremock's default 404.
        let err = fetcher.fetch("missing.html").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        // Nothing listens on port 1.
        let err = HttpFetcher::new("http://127.0.0.1:1/pages")
            .fetch("home.html")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(err.url(), "home.html");
    }

    #[tokio::test]
    async fn test_app_over_http() {
        init_logging();
        let server = MockServer::start().await;
        serve(&server, "home.html", HOME_HTML).await;
        serve(&server, "social.html", SOCIAL_HTML).await;
        let fetcher = HttpFetcher::new(format!("{}/pages", server.uri()));

        LocalSet::new()
            .run_until(async {
                let app = App::new(router(), fetcher);
                assert!(app.start().await.unwrap().is_rendered());

                let outcome = app.navigate("social").unwrap().await.unwrap();
                assert!(outcome.is_rendered());
                assert!(container_html(&app.router()).contains("<h1>Social</h1>"));
                assert_eq!(app.router().rebinder().len(), 3);
            })
            .await;
    }
}

// ============================================================================
// DirFetcher
// ============================================================================

fn pages_dir(pages: &[(&str, &[u8])]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, body) in pages {
        std::fs::write(dir.path().join(name), body).unwrap();
    }
    dir
}

#[tokio::test]
async fn test_dir_fetcher_reads_files() {
    let dir = pages_dir(&[("profile.html", PROFILE_HTML.as_bytes())]);

    let fetcher = DirFetcher::new(dir.path());
    assert_eq!(fetcher.fetch("profile.html").await.unwrap(), PROFILE_HTML);
    assert_eq!(fetcher.fetch("/profile.html").await.unwrap(), PROFILE_HTML);

    let err = fetcher.fetch("nope.html").await.unwrap_err();
    assert!(matches!(err, FetchError::Io { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_dir_fetcher_rejects_invalid_utf8() {
    let dir = pages_dir(&[("home.html", &[0xff, 0xfe, 0x00][..])]);

    let err = DirFetcher::new(dir.path())
        .fetch("home.html")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_app_over_dir() {
    let dir = pages_dir(&[
        ("home.html", HOME_HTML.as_bytes()),
        ("world.html", WORLD_HTML.as_bytes()),
    ]);

    LocalSet::new()
        .run_until(async {
            let app = App::new(router(), DirFetcher::new(dir.path()));
            app.router_mut().host_mut().set_hash("#world");
            assert!(app.start().await.unwrap().is_rendered());
            assert!(container_html(&app.router()).contains("<h1>World</h1>"));
        })
        .await;
}
