//! Unit tests for fragment extraction and splicing
//!
//! Tests for src/loader.rs through the router: region lookup order,
//! status bar wrapping, canonical vs synthesized content and padding.

use crate::common::*;
use hashnav::dom::Document;
use hashnav::loader::{FragmentExtractor, FragmentSelectors, LoadOutcome};
use hashnav::*;

fn extractor() -> FragmentExtractor {
    FragmentExtractor::new(&FragmentSelectors::default(), 80.0).unwrap()
}

fn render(page: &str, body: &str) -> (Router<HeadlessHost>, LoadOutcome) {
    let mut router = router();
    let load = match router.navigate_to(page).into_load() {
        Some(load) => load,
        None => router.refresh_page(),
    };
    let outcome = router.complete_load(&load, Ok(body.to_string()));
    (router, outcome)
}

// ========================================================================
// Extraction
// ========================================================================

#[test]
fn test_screen_region_wins_over_content() {
    let markup = extractor().extract(WORLD_HTML).unwrap();
    let doc = Document::parse(&markup);

    assert_eq!(doc.find_by_class(None, "status-bar-wrapper").len(), 1);
    assert_eq!(doc.find_by_class(None, "page-content").len(), 1);
    assert!(!markup.contains("iphone-screen"));
}

#[test]
fn test_status_bar_comes_first() {
    let markup = extractor().extract(HOME_HTML).unwrap();
    let doc = Document::parse(&markup);

    let first = doc.children(doc.root())[0];
    assert!(doc.has_class(first, "status-bar-wrapper"));
    assert_eq!(
        doc.style_property(first, "position").as_deref(),
        Some("sticky")
    );
    assert_eq!(doc.text_content(first), "9:41");
}

#[test]
fn test_content_region_without_status_bar() {
    let markup = extractor().extract(SOCIAL_HTML).unwrap();
    assert!(markup.starts_with(r#"<div class="page-content">"#));
    assert!(!markup.contains("status-bar-wrapper"));
}

#[test]
fn test_screen_without_content_is_wrapped() {
    let markup = extractor().extract(PROFILE_HTML).unwrap();
    assert_eq!(
        markup,
        r#"<div class="page-content" style="padding-bottom: 80px;"><h1>Profile</h1></div>"#
    );
}

#[test]
fn test_fragment_without_region() {
    assert_eq!(extractor().extract("<main><p>Nothing here</p></main>"), None);
    assert_eq!(extractor().extract(""), None);
}

#[test]
fn test_custom_selectors() {
    let selectors = FragmentSelectors {
        screen: "#frame".to_string(),
        content: ".body".to_string(),
        status_bar: ".clock".to_string(),
        content_class: "body".to_string(),
    };
    let extractor = FragmentExtractor::new(&selectors, 64.0).unwrap();

    let markup = extractor
        .extract(r#"<div id="frame"><i class="clock">12:00</i><section class="body">x</section></div>"#)
        .unwrap();
    assert!(markup.contains(r#"<i class="clock">12:00</i>"#));
    assert!(markup.ends_with(r#"<section class="body">x</section>"#));
}

// ========================================================================
// Splicing
// ========================================================================

#[test]
fn test_low_padding_is_raised() {
    let (router, outcome) = render("world", WORLD_HTML);
    assert!(outcome.is_rendered());

    let host = router.host();
    let content = host.query_class(None, "page-content")[0];
    assert_eq!(host.padding_bottom(content), 80.0);
}

#[test]
fn test_sufficient_padding_is_kept() {
    let body = r#"<div class="page-content" style="padding-bottom: 120px">Tall</div>"#;
    let (router, _) = render("profile", body);

    let host = router.host();
    let content = host.query_class(None, "page-content")[0];
    assert_eq!(host.padding_bottom(content), 120.0);
}

#[test]
fn test_splice_resets_scroll() {
    let mut router = router();
    let container = router.host().element_by_id("app-container").unwrap();
    router.host_mut().set_scroll_top(container, 300.0);

    let load = router.navigate_to("social").into_load().unwrap();
    router.complete_load(&load, Ok(SOCIAL_HTML.to_string()));

    assert_eq!(router.container_scroll_top(), Some(0.0));
}

#[test]
fn test_splice_replaces_previous_content() {
    let (mut router, _) = render("world", WORLD_HTML);
    let load = router.navigate_to("social").into_load().unwrap();
    router.complete_load(&load, Ok(SOCIAL_HTML.to_string()));

    let html = container_html(&router);
    assert!(html.contains("Social"));
    assert!(!html.contains("World"));
}

#[test]
fn test_malformed_fragment_is_silent() {
    let (router, outcome) = render("world", "<p>broken</p>");
    assert!(matches!(outcome, LoadOutcome::Malformed { ref page } if page == "world"));
    assert!(!container_html(&router).contains("Failed to load page"));
    assert_eq!(router.current_page(), "world");
}
