//! Tunables for gesture detection and transition timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Navigation thresholds, readable from the `[navigation]` table of `docs.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Accumulated wheel delta needed to change section
    pub scroll_threshold: f64,

    /// Vertical touch displacement needed to change section (exclusive)
    pub swipe_threshold: f64,

    /// How long a transition blocks further navigation, in milliseconds
    pub settle_ms: u64,

    /// Slack when deciding whether a tall section is scrolled to its bottom
    pub edge_tolerance: f64,
}

impl NavConfig {
    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 50.0,
            swipe_threshold: 50.0,
            settle_ms: 600,
            edge_tolerance: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let config: NavConfig = serde_json::from_str(r#"{"settle_ms": 350}"#).unwrap();

        assert_eq!(config.settle_delay(), Duration::from_millis(350));
        assert_eq!(config.scroll_threshold, 50.0);
        assert_eq!(config.edge_tolerance, 1.0);
    }
}
