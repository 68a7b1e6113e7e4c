//! Unit tests for feature rebinding
//!
//! Tests for src/features.rs through the router: tab families, links,
//! shortcuts, the feature registry and binding idempotence.

use crate::common::*;
use hashnav::features::feature_fn;
use hashnav::*;

const WORLD_VIEWS: [&str; 2] = ["offline-view", "digital-twin-view"];
const SOCIAL_VIEWS: [&str; 3] = ["feed-view", "match-view", "circle-view"];

fn rendered(page: &str, body: &str) -> Router<HeadlessHost> {
    let mut router = router();
    router.bind_navigation();
    let load = router.navigate_to(page).into_load().unwrap_or_else(|| router.refresh_page());
    assert!(router.complete_load(&load, Ok(body.to_string())).is_rendered());
    router.rebind_features(&load);
    router
}

#[test]
fn test_world_default_view() {
    let router = rendered("world", WORLD_HTML);
    assert_eq!(active_tabs(&router, "world-tab-item"), ["offline"]);
    assert_eq!(visible_views(&router, &WORLD_VIEWS), ["offline-view"]);
}

#[test]
fn test_world_switching() {
    let mut router = rendered("world", WORLD_HTML);

    for (tab, view) in [
        ("digital", "digital-twin-view"),
        ("offline", "offline-view"),
        ("offline", "offline-view"),
        ("digital", "digital-twin-view"),
    ] {
        let item = tab_item(&router, "world-tab-item", tab);
        let outcome = router.handle_click(item);
        assert_eq!(
            outcome,
            ClickOutcome::TabSelected {
                family: "world".to_string(),
                tab: Some(tab.to_string())
            }
        );
        assert_eq!(active_tabs(&router, "world-tab-item"), [tab]);
        assert_eq!(visible_views(&router, &WORLD_VIEWS), [view]);
    }
    assert_eq!(router.current_page(), "world");
}

#[test]
fn test_social_switching() {
    let mut router = rendered("social", SOCIAL_HTML);
    assert_eq!(visible_views(&router, &SOCIAL_VIEWS), ["feed-view"]);

    for (tab, view) in [
        ("match", "match-view"),
        ("circle", "circle-view"),
        ("feed", "feed-view"),
    ] {
        let item = tab_item(&router, "social-tab-item", tab);
        router.handle_click(item);
        assert_eq!(active_tabs(&router, "social-tab-item"), [tab]);
        assert_eq!(visible_views(&router, &SOCIAL_VIEWS), [view]);
    }
}

#[test]
fn test_click_inside_tab_item() {
    let mut router = rendered("world", WORLD_HTML);
    let item = tab_item(&router, "world-tab-item", "digital");
    let label = router.host().document().children(item)[0];

    router.handle_click(label);
    assert_eq!(active_tabs(&router, "world-tab-item"), ["digital"]);
}

#[test]
fn test_features_only_for_their_page() {
    // World markup served under the profile page gets no tab bindings.
    let mut router = rendered("profile", WORLD_HTML);
    let item = tab_item(&router, "world-tab-item", "digital");

    assert_eq!(router.handle_click(item), ClickOutcome::Ignored);
    assert_eq!(active_tabs(&router, "world-tab-item"), ["offline"]);
}

#[test]
fn test_rebinding_twice_binds_nothing_new() {
    let mut router = rendered("world", WORLD_HTML);
    let load = router.refresh_page();
    router.complete_load(&load, Ok(WORLD_HTML.to_string()));

    assert_eq!(router.rebind_features(&load), 2);
    assert_eq!(router.rebind_features(&load), 0);
    assert_eq!(router.rebinder().len(), 2);
}

#[test]
fn test_data_nav_link_navigates() {
    let mut router = rendered("home", HOME_HTML);
    let link = router.host().element_by_id("to-world").unwrap();

    let outcome = router.handle_click(link);
    assert_eq!(outcome.load().map(|load| load.url.as_str()), Some("world.html"));
    assert_eq!(router.current_page(), "world");
    assert_single_active_nav(&router);
}

#[test]
fn test_quick_action_shortcuts() {
    let mut router = rendered("home", HOME_HTML);

    let quiz = router.host().element_by_id("quiz").unwrap();
    assert_eq!(
        router.handle_click(quiz),
        ClickOutcome::External {
            url: "character-test.html".to_string()
        }
    );

    let script = router.host().element_by_id("script").unwrap();
    router.handle_click(script);

    assert_eq!(
        router.host().external_navigations(),
        ["character-test.html", "my-script.html"]
    );
    assert_eq!(router.current_page(), "home");
}

#[test]
fn test_custom_shortcut() {
    let config = RouterConfig::default().shortcut(Shortcut::new("open-map", "map.html"));
    let mut router = router_with(config);
    let load = router.refresh_page();
    let body = r#"<div class="page-content">
        <div id="map" class="quick-action-card" onclick="open-map()">Map</div>
    </div>"#;
    router.complete_load(&load, Ok(body.to_string()));
    router.rebind_features(&load);

    let map = router.host().element_by_id("map").unwrap();
    router.handle_click(map);
    assert_eq!(router.host().external_navigations(), ["map.html"]);
}

#[test]
fn test_registered_feature_runs_for_its_page() {
    let registry = FeatureRegistry::<HeadlessHost>::with_defaults().on(
        "profile",
        feature_fn(
            |host: &HeadlessHost, rebinder: &mut Rebinder<hashnav::dom::NodeId>| {
                host.query_class(None, "back")
                    .into_iter()
                    .filter(|&node| {
                        rebinder.bind(
                            node,
                            Binding::Nav {
                                page: "home".to_string(),
                            },
                        )
                    })
                    .count()
            },
        ),
    );
    let mut router = router().with_features(registry);

    let load = router.navigate_to("profile").into_load().unwrap();
    let body = r#"<div class="page-content"><button class="back">Back</button></div>"#;
    router.complete_load(&load, Ok(body.to_string()));
    assert_eq!(router.rebind_features(&load), 1);

    let back = router.host().query_class(None, "back")[0];
    router.handle_click(back);
    assert_eq!(router.current_page(), "home");
}
