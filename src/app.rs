//! Single-threaded driver.
//!
//! [`App`] wires a [`Router`] to a [`PageFetcher`] and the pull-to-refresh
//! detector, and runs every load as a local task: fetch, complete, wait for
//! the rebind delay, rebind. All of it happens on one thread inside a
//! [`tokio::task::LocalSet`]; the router is shared through `Rc<RefCell<_>>`
//! and no borrow is held across an await point.
//!
//! # Example
//!
//! ```
//! use hashnav::host::HeadlessHost;
//! use hashnav::loader::StaticFetcher;
//! use hashnav::{App, Router, RouterConfig};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let local = tokio::task::LocalSet::new();
//! local.run_until(async {
//!     let router = Router::new(
//!         RouterConfig::default(),
//!         HeadlessHost::shell(["home", "world", "social", "profile"]),
//!     ).unwrap();
//!     let fetcher = StaticFetcher::new()
//!         .page("home.html", r#"<div class="page-content">Home</div>"#);
//!     let app = App::new(router, fetcher);
//!
//!     let outcome = app.start().await.unwrap();
//!     assert!(outcome.is_rendered());
//! }).await;
//! # });
//! ```

use crate::gesture::PullToRefresh;
use crate::host::Host;
use crate::loader::{LoadOutcome, PageFetcher};
use crate::router::{ClickOutcome, Router};
use crate::state::LoadRequest;
use crate::trace_log;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Router plus fetcher plus gesture detector, driven by host events.
///
/// Every method that may start a load returns the task's [`JoinHandle`].
/// Dropping the handle does not cancel the load. Must be used from within a
/// [`LocalSet`](tokio::task::LocalSet).
pub struct App<H: Host> {
    router: Rc<RefCell<Router<H>>>,
    fetcher: Rc<dyn PageFetcher>,
    gesture: RefCell<PullToRefresh>,
    rebind_delay: Duration,
}

impl<H: Host> App<H> {
    /// Create a driver. Thresholds and delays come from the router's config.
    pub fn new(router: Router<H>, fetcher: impl PageFetcher + 'static) -> Self {
        let gesture = PullToRefresh::new(router.config().gesture);
        let rebind_delay = router.config().rebind_delay();
        Self {
            router: Rc::new(RefCell::new(router)),
            fetcher: Rc::new(fetcher),
            gesture: RefCell::new(gesture),
            rebind_delay,
        }
    }

    /// Borrow the router.
    pub fn router(&self) -> Ref<'_, Router<H>> {
        self.router.borrow()
    }

    /// Borrow the router mutably, e.g. to change the host's hash.
    pub fn router_mut(&self) -> RefMut<'_, Router<H>> {
        self.router.borrow_mut()
    }

    /// Load the initial page.
    pub fn start(&self) -> JoinHandle<LoadOutcome> {
        let load = self.router.borrow_mut().start();
        self.dispatch(load)
    }

    /// Navigate to `page`.
    pub fn navigate(&self, page: &str) -> Option<JoinHandle<LoadOutcome>> {
        let load = self.router.borrow_mut().navigate_to(page).into_load()?;
        Some(self.dispatch(load))
    }

    /// The host reported a hash change.
    pub fn hash_changed(&self) -> Option<JoinHandle<LoadOutcome>> {
        let load = self.router.borrow_mut().on_hash_change().into_load()?;
        Some(self.dispatch(load))
    }

    /// Reload the current page.
    pub fn refresh(&self) -> JoinHandle<LoadOutcome> {
        let load = self.router.borrow_mut().refresh_page();
        self.dispatch(load)
    }

    /// The host reported a click on `target`.
    pub fn click(&self, target: H::Node) -> (ClickOutcome, Option<JoinHandle<LoadOutcome>>) {
        let outcome = self.router.borrow_mut().handle_click(target);
        let task = outcome.load().cloned().map(|load| self.dispatch(load));
        (outcome, task)
    }

    /// A touch sequence started at viewport `y`.
    pub fn touch_start(&self, y: f64) {
        let Some(scroll_top) = self.router.borrow().container_scroll_top() else {
            return;
        };
        self.gesture.borrow_mut().touch_start(y, scroll_top);
    }

    /// The finger moved to `y`. Returns `true` when the host must suppress
    /// native scrolling for this move.
    pub fn touch_move(&self, y: f64) -> bool {
        let Some(scroll_top) = self.router.borrow().container_scroll_top() else {
            return false;
        };
        self.gesture.borrow_mut().touch_move(y, scroll_top)
    }

    /// The touch sequence ended. Starts a refresh when the pull was long enough.
    pub fn touch_end(&self) -> Option<JoinHandle<LoadOutcome>> {
        let refresh = self.gesture.borrow_mut().touch_end();
        refresh.then(|| self.refresh())
    }

    /// The touch sequence was cancelled.
    pub fn touch_cancel(&self) {
        self.gesture.borrow_mut().touch_cancel();
    }

    fn dispatch(&self, load: LoadRequest) -> JoinHandle<LoadOutcome> {
        let router = Rc::clone(&self.router);
        let fetcher = Rc::clone(&self.fetcher);
        let delay = self.rebind_delay;

        tokio::task::spawn_local(async move {
            let result = fetcher.fetch(&load.url).await;
            let outcome = router.borrow_mut().complete_load(&load, result);
            if outcome.is_rendered() {
                tokio::time::sleep(delay).await;
                let bound = router.borrow_mut().rebind_features(&load);
                trace_log!("Load #{} finished with {} new binding(s)", load.id, bound);
            }
            outcome
        })
    }
}

impl<H: Host> fmt::Debug for App<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("router", &self.router)
            .field("gesture", &self.gesture)
            .field("rebind_delay", &self.rebind_delay)
            .finish_non_exhaustive()
    }
}
