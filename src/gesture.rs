//! Pull-to-refresh gesture recognition.
//!
//! [`PullToRefresh`] turns one touch sequence (start → moves → end) into at
//! most one refresh request:
//!
//! ```text
//! idle ──start @ scroll 0──▶ tracking ──move > pull_threshold──▶ pulling
//!   ▲                            │                                  │
//!   └────────────── end (always resets) ◀───────────────────────────┘
//! ```
//!
//! A refresh fires on touch end only from `pulling`, and only when the
//! downward displacement exceeds `refresh_threshold`. The detector owns its
//! state and never touches the router; the caller acts on the returned
//! signal.
//!
//! # Example
//!
//! ```
//! use hashnav::gesture::PullToRefresh;
//!
//! let mut gesture = PullToRefresh::default();
//! gesture.touch_start(100.0, 0.0);
//! assert!(gesture.touch_move(200.0, 0.0));   // native scroll suppressed
//! assert!(gesture.touch_end());              // 100 > 80: refresh
//! assert!(!gesture.is_tracking());
//! ```

use crate::trace_log;
use serde::{Deserialize, Serialize};

/// Thresholds in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Displacement past which the sequence counts as a pull.
    pub pull_threshold: f64,
    /// Displacement past which releasing a pull triggers a refresh.
    pub refresh_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pull_threshold: 10.0,
            refresh_threshold: 80.0,
        }
    }
}

/// Touch-sequence state machine for pull-to-refresh.
#[derive(Debug, Clone, Default)]
pub struct PullToRefresh {
    config: GestureConfig,
    start_y: Option<f64>,
    is_pulling: bool,
    pull_distance: f64,
}

impl PullToRefresh {
    /// Create a detector with custom thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Whether a sequence is being tracked.
    pub fn is_tracking(&self) -> bool {
        self.start_y.is_some()
    }

    /// Whether the current sequence has become a pull.
    pub fn is_pulling(&self) -> bool {
        self.is_pulling
    }

    /// Downward displacement recorded for the current sequence.
    pub fn pull_distance(&self) -> f64 {
        self.pull_distance
    }

    /// First touch of a sequence at viewport `y`.
    ///
    /// Tracking starts only when the scroll container is at the very top.
    pub fn touch_start(&mut self, y: f64, scroll_top: f64) {
        if scroll_top == 0.0 {
            trace_log!("Pull tracking started at y={}", y);
            self.start_y = Some(y);
            self.is_pulling = false;
        }
    }

    /// Finger moved to `y`.
    ///
    /// Returns `true` when the host must suppress native scrolling for this
    /// move (the sequence is an active pull past the pull threshold).
    pub fn touch_move(&mut self, y: f64, scroll_top: f64) -> bool {
        let Some(start_y) = self.start_y else {
            return false;
        };
        if scroll_top != 0.0 || y <= start_y {
            return false;
        }

        self.pull_distance = y - start_y;
        if self.pull_distance > self.config.pull_threshold {
            if !self.is_pulling {
                trace_log!("Pull engaged at distance {}", self.pull_distance);
            }
            self.is_pulling = true;
            return true;
        }
        false
    }

    /// Sequence ended. Returns `true` exactly when a refresh is due.
    ///
    /// All state is reset regardless of the outcome.
    pub fn touch_end(&mut self) -> bool {
        let refresh = self.is_pulling && self.pull_distance > self.config.refresh_threshold;
        if refresh {
            trace_log!("Pull released at distance {}: refresh", self.pull_distance);
        }
        self.reset();
        refresh
    }

    /// Sequence interrupted (e.g. `touchcancel`). Never refreshes.
    pub fn touch_cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.start_y = None;
        self.is_pulling = false;
        self.pull_distance = 0.0;
    }
}
