//! Integration tests for complete navigation scenarios
//!
//! Every test drives the `App` on a `LocalSet` with a paused clock, so
//! fetch latency and the rebind delay are deterministic.

use crate::common::*;
use hashnav::loader::{LoadOutcome, StaticFetcher};
use hashnav::*;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::sleep;

const WORLD_VIEWS: [&str; 2] = ["offline-view", "digital-twin-view"];

// ========================================================================
// Startup
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_world_hash_on_load() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.router_mut().host_mut().set_hash("#world");

            let outcome = app.start().await.unwrap();
            assert!(outcome.is_rendered());

            let router = app.router();
            assert_eq!(router.current_page(), "world");
            assert_single_active_nav(&router);
            assert!(container_html(&router).contains("<h1>World</h1>"));
            assert_eq!(visible_views(&router, &WORLD_VIEWS), ["offline-view"]);
            assert_eq!(router.rebinder().len(), 2);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_hash_loads_home() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            assert!(app.start().await.unwrap().is_rendered());

            let router = app.router();
            assert_eq!(router.current_page(), "home");
            assert!(container_html(&router).contains("<h1>Home</h1>"));
            assert!(container_html(&router).contains("status-bar-wrapper"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_rebind_waits_for_delay() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            let task = app.start();

            sleep(Duration::from_millis(50)).await;
            assert!(container_html(&app.router()).contains("<h1>Home</h1>"));
            assert!(app.router().rebinder().is_empty());

            task.await.unwrap();
            assert_eq!(app.router().rebinder().len(), 3);
        })
        .await;
}

// ========================================================================
// Failures
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_missing_page_shows_error_and_keeps_state() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let router = router_with(RouterConfig::default().page("missingpage"));
            let app = App::new(router, fetcher());
            app.router_mut().host_mut().set_hash("#missingpage");

            let outcome = app.start().await.unwrap();
            match outcome {
                LoadOutcome::Failed { page, error } => {
                    assert_eq!(page, "missingpage");
                    assert!(error.is_not_found());
                    assert_eq!(error.url(), "missingpage.html");
                }
                other => panic!("expected Failed, got {other:?}"),
            }

            let router = app.router();
            assert_eq!(router.current_page(), "missingpage");
            assert!(container_html(&router).contains("Failed to load page"));
            assert!(router.rebinder().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_failure() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(StaticFetcher::new().page("home.html", HOME_HTML));
            app.start().await.unwrap();

            let task = app.navigate("social").unwrap();
            assert!(task.await.unwrap().is_failed());

            // Navigating away and back is the user's retry.
            app.navigate("home").unwrap().await.unwrap();
            assert!(container_html(&app.router()).contains("<h1>Home</h1>"));
        })
        .await;
}

// ========================================================================
// Races
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_rapid_navigation_shows_last_page() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app_with_slow_world(Duration::from_millis(500));
            app.start().await.unwrap();

            let world = app.navigate("world").unwrap();
            let social = app.navigate("social").unwrap();

            assert!(social.await.unwrap().is_rendered());
            assert!(world.await.unwrap().is_stale());

            let router = app.router();
            assert_eq!(router.current_page(), "social");
            assert_single_active_nav(&router);
            let html = container_html(&router);
            assert!(html.contains("<h1>Social</h1>"));
            assert!(!html.contains("<h1>World</h1>"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_last_navigation_still_wins() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher().delay("social.html", Duration::from_millis(300)));
            app.start().await.unwrap();

            let world = app.navigate("world").unwrap();
            let social = app.navigate("social").unwrap();

            assert!(world.await.unwrap().is_stale());
            assert!(container_html(&app.router()).contains("Loading..."));

            assert!(social.await.unwrap().is_rendered());
            assert!(container_html(&app.router()).contains("<h1>Social</h1>"));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_navigation_during_rebind_delay() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();

            let world = app.navigate("world").unwrap();
            sleep(Duration::from_millis(10)).await;
            let social = app.navigate("social").unwrap();

            // World rendered, then was superseded before its rebind ran.
            assert!(world.await.unwrap().is_rendered());
            social.await.unwrap();

            let router = app.router();
            assert_eq!(router.rebinder().len(), 3);
            assert!(container_html(&router).contains("<h1>Social</h1>"));
        })
        .await;
}

// ========================================================================
// Events
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_repeated_navigation_loads_once() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();

            assert!(app.navigate("profile").is_some());
            assert!(app.navigate("profile").is_none());
            assert_eq!(app.router().host().history(), ["#profile"]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_nav_bar_and_back_button() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();

            for page in ["world", "social", "profile"] {
                let item = nav_item(&app.router(), page);
                let (outcome, task) = app.click(item);
                assert!(matches!(outcome, ClickOutcome::Navigated(_)));
                task.unwrap().await.unwrap();
                assert_single_active_nav(&app.router());
            }

            // Back button: the host rewrites the hash and reports it.
            app.router_mut().host_mut().set_hash("#social");
            app.hash_changed().unwrap().await.unwrap();
            assert_eq!(app.router().current_page(), "social");
            assert_single_active_nav(&app.router());
            assert!(app.hash_changed().is_none());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_tabs_after_navigation() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();
            app.navigate("world").unwrap().await.unwrap();

            let digital = tab_item(&app.router(), "world-tab-item", "digital");
            let (outcome, task) = app.click(digital);
            assert!(task.is_none());
            assert!(matches!(outcome, ClickOutcome::TabSelected { .. }));

            let router = app.router();
            assert_eq!(active_tabs(&router, "world-tab-item"), ["digital"]);
            assert_eq!(visible_views(&router, &WORLD_VIEWS), ["digital-twin-view"]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_home_links_and_shortcuts() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();

            let quiz = app.router().host().element_by_id("quiz").unwrap();
            let (_, task) = app.click(quiz);
            assert!(task.is_none());
            assert_eq!(
                app.router().host().external_navigations(),
                ["character-test.html"]
            );

            let link = app.router().host().element_by_id("to-world").unwrap();
            let (_, task) = app.click(link);
            assert!(task.unwrap().await.unwrap().is_rendered());
            assert_eq!(app.router().current_page(), "world");
        })
        .await;
}

// ========================================================================
// Gestures
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_pull_to_refresh_reloads_once() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.router_mut().host_mut().set_hash("#social");
            app.start().await.unwrap();
            let before = app.router().state().navigation_id();

            app.touch_start(200.0);
            assert!(!app.touch_move(205.0));
            assert!(app.touch_move(260.0));
            assert!(app.touch_move(290.0));
            let refresh = app.touch_end().expect("pull past threshold refreshes");

            assert!(refresh.await.unwrap().is_rendered());
            let router = app.router();
            assert_eq!(router.state().navigation_id(), before + 1);
            assert_eq!(router.current_page(), "social");
            assert_eq!(router.host().history(), ["#social"]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_pull_at_threshold_does_not_refresh() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();
            let before = app.router().state().navigation_id();

            app.touch_start(100.0);
            app.touch_move(180.0);
            assert!(app.touch_end().is_none());

            app.touch_start(100.0);
            app.touch_move(300.0);
            app.touch_cancel();
            assert!(app.touch_end().is_none());

            assert_eq!(app.router().state().navigation_id(), before);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_pull_ignored_when_scrolled() {
    init_logging();
    LocalSet::new()
        .run_until(async {
            let app = app(fetcher());
            app.start().await.unwrap();
            {
                let mut router = app.router_mut();
                let container = router.host().element_by_id("app-container").unwrap();
                router.host_mut().set_scroll_top(container, 12.0);
            }

            app.touch_start(0.0);
            assert!(!app.touch_move(400.0));
            assert!(app.touch_end().is_none());
        })
        .await;
}
