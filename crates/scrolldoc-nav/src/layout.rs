//! Section positioning, tallness, and scroll-edge detection.

use serde::Serialize;

/// Where a section container sits relative to the active one.
///
/// The renderer uses this to pick the transition direction: sections above
/// the active one slide out upward, sections below wait underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Above,
    Active,
    Below,
}

impl Position {
    /// Position of section `index` when `current` is active.
    pub fn of(index: usize, current: usize) -> Self {
        if index == current {
            Self::Active
        } else if index < current {
            Self::Above
        } else {
            Self::Below
        }
    }

    /// CSS class carried by the container. Below is implicit.
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Self::Above => Some("above"),
            Self::Active => Some("active"),
            Self::Below => None,
        }
    }
}

/// Scroll geometry of a section container, as measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current internal scroll offset
    pub scroll_top: f64,

    /// Visible height of the container
    pub client_height: f64,

    /// Total height of the container's content
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }

    /// `tolerance` absorbs subpixel rounding in the host's measurements.
    pub fn at_bottom(&self, tolerance: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - tolerance
    }

    /// Whether a gesture moving by `delta` can still scroll the content natively.
    pub fn has_room(&self, delta: f64, tolerance: f64) -> bool {
        (delta > 0.0 && !self.at_bottom(tolerance)) || (delta < 0.0 && !self.at_top())
    }
}

/// A section is tall when its content overflows the viewport.
pub fn is_tall(content_height: f64, viewport_height: f64) -> bool {
    content_height > viewport_height
}
