//! Router state management

/// A dispatched fragment load.
///
/// Every load carries the navigation id it was dispatched under. Completing
/// a load whose id is no longer the newest is a no-op, so only the most
/// recent navigation's content ever reaches the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Logical page being loaded.
    pub page: String,
    /// Resource to fetch, e.g. `world.html`.
    pub url: String,
    /// Navigation id at dispatch time.
    pub id: usize,
}

impl LoadRequest {
    /// Create a load request.
    pub fn new(page: impl Into<String>, url: impl Into<String>, id: usize) -> Self {
        Self {
            page: page.into(),
            url: url.into(),
            id,
        }
    }
}

/// Router state
#[derive(Debug, Clone)]
pub struct RouterState {
    /// Page currently shown (or being loaded)
    current_page: String,
    /// Navigation id counter for stale-load detection.
    /// Each dispatched load increments this.
    navigation_id: usize,
}

impl RouterState {
    /// Create a new router state positioned on `initial_page`.
    pub fn new(initial_page: impl Into<String>) -> Self {
        Self {
            current_page: initial_page.into(),
            navigation_id: 0,
        }
    }

    /// Get current page
    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    /// Move to `page`. Returns the page we left.
    pub fn enter(&mut self, page: impl Into<String>) -> String {
        std::mem::replace(&mut self.current_page, page.into())
    }

    /// Get current navigation ID
    pub fn navigation_id(&self) -> usize {
        self.navigation_id
    }

    /// Start a new navigation and return the new navigation ID
    ///
    /// Loads dispatched under an older id are superseded from this point on.
    pub fn start_navigation(&mut self) -> usize {
        self.navigation_id += 1;
        self.navigation_id
    }

    /// Check if a navigation is still current (not superseded by a newer one)
    pub fn is_navigation_current(&self, nav_id: usize) -> bool {
        self.navigation_id == nav_id
    }
}
