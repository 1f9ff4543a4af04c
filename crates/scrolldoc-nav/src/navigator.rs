//! Section navigation controller.
//!
//! The [`Navigator`] owns the navigation state of one page. Input handlers
//! decide whether an event should change the visible section and return a
//! [`Dispatch`] describing what the host must do; the host applies class
//! changes, resets scroll offsets, replaces the URL fragment, and calls
//! [`Navigator::settle`] once the settle delay has elapsed.

use std::time::Duration;

use serde::Serialize;

use crate::config::NavConfig;
use crate::layout::{is_tall, Position, ScrollMetrics};
use crate::section::Partition;

/// Transition phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    /// A section change is animating; further navigation is dropped
    Transitioning { target: usize },
}

/// A section change the host must apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Previously active section
    pub from: usize,

    /// Newly active section, whose scroll offset must be reset to zero
    pub to: usize,

    /// Id to put in the URL fragment, replacing the current history entry
    pub fragment: String,

    /// When to call [`Navigator::settle`]
    pub settle_after: Duration,
}

/// Outcome of an input event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Suppress the event's native behavior (page scroll, key default)
    pub prevent_default: bool,

    /// Section change triggered by the event
    pub transition: Option<Transition>,
}

impl Dispatch {
    /// Leave the event to the browser.
    fn pass() -> Self {
        Self::default()
    }

    /// Consume the event, optionally changing section.
    fn consume(transition: Option<Transition>) -> Self {
        Self {
            prevent_default: true,
            transition,
        }
    }
}

/// Keys the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    PageDown,
    ArrowUp,
    PageUp,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" => Self::ArrowDown,
            "PageDown" => Self::PageDown,
            "ArrowUp" => Self::ArrowUp,
            "PageUp" => Self::PageUp,
            _ => Self::Other,
        }
    }

    fn direction(&self) -> Option<Direction> {
        match self {
            Self::ArrowDown | Self::PageDown => Some(Direction::Next),
            Self::ArrowUp | Self::PageUp => Some(Direction::Previous),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Positive deltas move toward later sections.
    fn of(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Next)
        } else if delta < 0.0 {
            Some(Self::Previous)
        } else {
            None
        }
    }
}

/// Navigation state for one page.
#[derive(Debug, Clone)]
pub struct Navigator {
    ids: Vec<String>,
    current: usize,
    phase: Phase,
    scroll_accumulator: f64,
    touch_start_y: f64,
    tall: Vec<bool>,
    config: NavConfig,
}

impl Navigator {
    /// Create a navigator over sections with the given ids, starting at the first.
    pub fn new(ids: Vec<String>, config: NavConfig) -> Self {
        let tall = vec![false; ids.len()];
        Self {
            ids,
            current: 0,
            phase: Phase::Idle,
            scroll_accumulator: 0.0,
            touch_start_y: 0.0,
            tall,
            config,
        }
    }

    /// Create a navigator for a partitioned document.
    pub fn for_partition<N>(partition: &Partition<N>, config: NavConfig) -> Self {
        Self::new(partition.ids(), config)
    }

    /// Jump to the section named by a URL fragment, without a transition.
    ///
    /// Only sections after the first are honored; an unknown id or the first
    /// section's id leaves the navigator where it is. Returns whether the
    /// active section changed.
    pub fn restore_fragment(&mut self, fragment: &str) -> bool {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        match self.ids.iter().position(|s| s == id) {
            Some(index) if index > 0 => {
                tracing::debug!(index, id, "restoring section from fragment");
                self.current = index;
                true
            }
            _ => false,
        }
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Index of the active section.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// Wheel delta not yet consumed by a section change.
    pub fn scroll_accumulator(&self) -> f64 {
        self.scroll_accumulator
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn section_id(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Container position of section `index`.
    pub fn position(&self, index: usize) -> Position {
        Position::of(index, self.current)
    }

    /// Container positions of every section, in order.
    pub fn positions(&self) -> Vec<Position> {
        (0..self.ids.len()).map(|i| self.position(i)).collect()
    }

    /// Whether the sidebar control for section `index` is active.
    pub fn is_control_active(&self, index: usize) -> bool {
        index == self.current
    }

    /// Reclassify every section against the viewport height.
    ///
    /// Call after the initial render and again on every resize.
    /// `content_heights` is indexed like the sections; missing entries are
    /// treated as not tall.
    pub fn update_tall(&mut self, viewport_height: f64, content_heights: &[f64]) {
        for (i, tall) in self.tall.iter_mut().enumerate() {
            *tall = content_heights
                .get(i)
                .is_some_and(|height| is_tall(*height, viewport_height));
        }
    }

    pub fn is_tall(&self, index: usize) -> bool {
        self.tall.get(index).copied().unwrap_or(false)
    }

    /// Make section `target` the active one.
    ///
    /// Returns `None`, leaving all state untouched, when the target is out of
    /// range, already active, or a transition is still settling.
    pub fn show_section(&mut self, target: usize) -> Option<Transition> {
        if target >= self.ids.len() || self.is_transitioning() || target == self.current {
            return None;
        }

        let from = self.current;
        self.current = target;
        self.phase = Phase::Transitioning { target };
        tracing::debug!(from, to = target, "section transition");

        Some(Transition {
            from,
            to: target,
            fragment: self.ids[target].clone(),
            settle_after: self.config.settle_delay(),
        })
    }

    /// End the current transition. Called by the host when the settle delay fires.
    pub fn settle(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Sidebar button click.
    pub fn click(&mut self, index: usize) -> Dispatch {
        Dispatch {
            prevent_default: false,
            transition: self.show_section(index),
        }
    }

    /// Mouse wheel or trackpad scroll over the page.
    ///
    /// `metrics` describes the active section's container.
    pub fn wheel(&mut self, delta_y: f64, metrics: ScrollMetrics) -> Dispatch {
        if self.is_transitioning() {
            return Dispatch::consume(None);
        }

        if self.is_tall(self.current) && metrics.has_room(delta_y, self.config.edge_tolerance) {
            return Dispatch::pass();
        }

        self.scroll_accumulator += delta_y;
        if self.scroll_accumulator.abs() < self.config.scroll_threshold {
            return Dispatch::consume(None);
        }

        let transition = Direction::of(self.scroll_accumulator).and_then(|d| self.step(d));
        self.scroll_accumulator = 0.0;
        Dispatch::consume(transition)
    }

    /// Finger down. Only the vertical coordinate matters.
    pub fn touch_start(&mut self, client_y: f64) {
        self.touch_start_y = client_y;
    }

    /// Finger up; swiping up (moving the finger toward the top) advances.
    ///
    /// Touch listeners are passive, so the dispatch never prevents default.
    pub fn touch_end(&mut self, client_y: f64, metrics: ScrollMetrics) -> Dispatch {
        if self.is_transitioning() {
            return Dispatch::pass();
        }

        let displacement = self.touch_start_y - client_y;
        if self.is_tall(self.current) && metrics.has_room(displacement, self.config.edge_tolerance)
        {
            return Dispatch::pass();
        }

        if displacement.abs() <= self.config.swipe_threshold {
            return Dispatch::pass();
        }

        Dispatch {
            prevent_default: false,
            transition: Direction::of(displacement).and_then(|d| self.step(d)),
        }
    }

    /// Key press. Navigation keys are consumed even at the first or last section.
    pub fn key(&mut self, key: Key) -> Dispatch {
        if self.is_transitioning() {
            return Dispatch::pass();
        }

        match key.direction() {
            Some(direction) => Dispatch::consume(self.step(direction)),
            None => Dispatch::pass(),
        }
    }

    fn step(&mut self, direction: Direction) -> Option<Transition> {
        match direction {
            Direction::Next if self.current + 1 < self.ids.len() => {
                self.show_section(self.current + 1)
            }
            Direction::Previous if self.current > 0 => self.show_section(self.current - 1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::partition;
    use crate::section::tests::{h1, h2, p};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn navigator(count: usize) -> Navigator {
        let ids = (0..count).map(|i| format!("s{i}")).collect();
        Navigator::new(ids, NavConfig::default())
    }

    fn flat() -> ScrollMetrics {
        ScrollMetrics::new(0.0, 800.0, 400.0)
    }

    #[test]
    fn show_section_moves_and_blocks_until_settled() {
        let mut nav = navigator(3);

        let transition = nav.show_section(2).unwrap();

        assert_eq!(
            transition,
            Transition {
                from: 0,
                to: 2,
                fragment: "s2".to_string(),
                settle_after: Duration::from_millis(600),
            }
        );
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.phase(), Phase::Transitioning { target: 2 });

        assert!(nav.show_section(1).is_none());
        assert_eq!(nav.current(), 2);

        nav.settle();
        assert!(!nav.is_transitioning());
        assert!(nav.show_section(1).is_some());
    }

    #[test]
    fn show_section_ignores_current_and_out_of_range() {
        let mut nav = navigator(3);

        assert!(nav.show_section(0).is_none());
        assert!(nav.show_section(3).is_none());
        assert!(nav.show_section(usize::MAX).is_none());
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn positions_follow_active_section() {
        let mut nav = navigator(4);
        nav.show_section(2);

        assert_eq!(
            nav.positions(),
            vec![
                Position::Above,
                Position::Above,
                Position::Active,
                Position::Below
            ]
        );
        let active: Vec<_> = (0..4).filter(|i| nav.is_control_active(*i)).collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn wheel_accumulates_to_threshold() {
        let mut nav = navigator(3);

        for _ in 0..4 {
            let dispatch = nav.wheel(10.0, flat());
            assert!(dispatch.prevent_default);
            assert!(dispatch.transition.is_none());
        }
        assert_eq!(nav.scroll_accumulator(), 40.0);

        let dispatch = nav.wheel(10.0, flat());

        assert_eq!(dispatch.transition.map(|t| t.to), Some(1));
        assert_eq!(nav.scroll_accumulator(), 0.0);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn wheel_is_swallowed_while_transitioning() {
        let mut nav = navigator(3);
        nav.show_section(1);

        let dispatch = nav.wheel(500.0, flat());

        assert!(dispatch.prevent_default);
        assert!(dispatch.transition.is_none());
        assert_eq!(nav.scroll_accumulator(), 0.0);
    }

    #[test]
    fn wheel_resets_accumulator_at_the_last_section() {
        let mut nav = navigator(1);

        let dispatch = nav.wheel(80.0, flat());

        assert!(dispatch.transition.is_none());
        assert_eq!(nav.scroll_accumulator(), 0.0);
    }

    #[test]
    fn wheel_upward_goes_back() {
        let mut nav = navigator(3);
        nav.show_section(2);
        nav.settle();

        let dispatch = nav.wheel(-60.0, flat());

        assert_eq!(dispatch.transition.map(|t| t.to), Some(1));
    }

    #[test]
    fn tall_section_scrolls_natively_until_edge() {
        let mut nav = navigator(3);
        nav.update_tall(800.0, &[2000.0, 300.0, 300.0]);
        assert!(nav.is_tall(0));

        let middle = ScrollMetrics::new(400.0, 800.0, 2000.0);
        let dispatch = nav.wheel(100.0, middle);
        assert_eq!(dispatch, Dispatch::default());
        assert_eq!(nav.scroll_accumulator(), 0.0);

        let bottom = ScrollMetrics::new(1200.0, 800.0, 2000.0);
        let dispatch = nav.wheel(100.0, bottom);
        assert!(dispatch.prevent_default);
        assert_eq!(dispatch.transition.map(|t| t.to), Some(1));
    }

    #[test]
    fn tall_section_at_top_still_scrolls_down() {
        let mut nav = navigator(2);
        nav.update_tall(800.0, &[2000.0, 300.0]);

        let top = ScrollMetrics::new(0.0, 800.0, 2000.0);
        assert_eq!(nav.wheel(100.0, top), Dispatch::default());
        assert_eq!(nav.wheel(-100.0, top).transition, None);
    }

    #[test]
    fn tallness_tracks_resizes() {
        let mut nav = navigator(2);
        let heights = [900.0, 500.0];

        nav.update_tall(1000.0, &heights);
        assert!(!nav.is_tall(0));

        nav.update_tall(700.0, &heights);
        assert!(nav.is_tall(0));
        assert!(!nav.is_tall(1));

        nav.update_tall(400.0, &heights);
        assert!(nav.is_tall(1));
    }

    #[test]
    fn swipe_needs_more_than_threshold() {
        let mut nav = navigator(3);

        nav.touch_start(300.0);
        assert!(nav.touch_end(250.0, flat()).transition.is_none());

        nav.touch_start(300.0);
        let dispatch = nav.touch_end(249.0, flat());
        assert!(!dispatch.prevent_default);
        assert_eq!(dispatch.transition.map(|t| t.to), Some(1));
    }

    #[test]
    fn swipe_down_goes_back_and_is_ignored_mid_transition() {
        let mut nav = navigator(3);
        nav.show_section(1);

        nav.touch_start(100.0);
        assert!(nav.touch_end(400.0, flat()).transition.is_none());

        nav.settle();
        nav.touch_start(100.0);
        assert_eq!(
            nav.touch_end(400.0, flat()).transition.map(|t| t.to),
            Some(0)
        );
    }

    #[test]
    fn swipe_in_tall_section_respects_edges() {
        let mut nav = navigator(2);
        nav.update_tall(600.0, &[1500.0, 100.0]);

        nav.touch_start(500.0);
        let middle = ScrollMetrics::new(200.0, 600.0, 1500.0);
        assert!(nav.touch_end(100.0, middle).transition.is_none());

        nav.touch_start(500.0);
        let bottom = ScrollMetrics::new(900.0, 600.0, 1500.0);
        assert_eq!(nav.touch_end(100.0, bottom).transition.map(|t| t.to), Some(1));
    }

    #[test]
    fn keys_step_and_consume_at_bounds() {
        let mut nav = navigator(2);

        let up = nav.key(Key::ArrowUp);
        assert!(up.prevent_default);
        assert!(up.transition.is_none());

        let down = nav.key(Key::from_name("PageDown"));
        assert_eq!(down.transition.map(|t| t.to), Some(1));

        assert_eq!(nav.key(Key::ArrowUp), Dispatch::default());

        nav.settle();
        assert_eq!(nav.key(Key::from_name("Enter")), Dispatch::default());
        assert_eq!(nav.key(Key::PageUp).transition.map(|t| t.to), Some(0));
    }

    #[test]
    fn click_jumps_to_index() {
        let mut nav = navigator(5);

        let dispatch = nav.click(3);

        assert!(!dispatch.prevent_default);
        assert_eq!(dispatch.transition.map(|t| t.fragment), Some("s3".to_string()));
    }

    #[test]
    fn fragment_restores_later_sections_only() {
        let doc = partition(vec![h1("Doc"), p("intro"), h2("Install"), h2("Usage")]);

        let mut nav = Navigator::for_partition(&doc, NavConfig::default());
        assert!(nav.restore_fragment("#install"));
        assert_eq!(nav.current(), 1);
        assert!(!nav.is_transitioning());
        assert_eq!(nav.position(0), Position::Above);

        let mut nav = Navigator::for_partition(&doc, NavConfig::default());
        assert!(!nav.restore_fragment("intro"));
        assert!(!nav.restore_fragment("#missing"));
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn empty_navigator_ignores_everything() {
        let mut nav = navigator(0);

        assert!(nav.is_empty());
        assert!(nav.wheel(100.0, flat()).transition.is_none());
        assert!(nav.key(Key::ArrowDown).transition.is_none());
        assert!(nav.click(0).transition.is_none());
    }

    proptest! {
        #[test]
        fn redundant_requests_never_change_state(
            count in 1usize..8,
            start in 0usize..8,
            transitioning in any::<bool>(),
            extra in 0usize..4,
        ) {
            let mut nav = navigator(count);
            let start = start % count;
            if start > 0 {
                nav.show_section(start);
            }
            if !transitioning {
                nav.settle();
            }
            let phase = nav.phase();

            prop_assert!(nav.show_section(start).is_none());
            prop_assert!(nav.show_section(count + extra).is_none());
            prop_assert_eq!(nav.current(), start);
            prop_assert_eq!(nav.phase(), phase);
        }

        #[test]
        fn exactly_one_active_after_navigation(count in 1usize..10, target in 0usize..10) {
            let mut nav = navigator(count);
            nav.show_section(target);

            let current = nav.current();
            let positions = nav.positions();
            prop_assert_eq!(positions.iter().filter(|p| **p == Position::Active).count(), 1);
            prop_assert!(positions[..current].iter().all(|p| *p == Position::Above));
            prop_assert_eq!((0..count).filter(|i| nav.is_control_active(*i)).count(), 1);
        }
    }
}
