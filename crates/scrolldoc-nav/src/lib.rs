//! Section partitioning and scroll navigation for single-page documentation.
//!
//! This crate turns a rendered document into an ordered list of sections and
//! provides the state machine that decides which section is visible in
//! response to clicks, wheel scrolling, touch swipes, keys, and the URL
//! fragment. It performs no I/O; a host applies its decisions.

pub mod config;
pub mod layout;
pub mod navigator;
pub mod section;

pub use config::NavConfig;
pub use layout::{Position, ScrollMetrics};
pub use navigator::{Dispatch, Key, Navigator, Phase, Transition};
pub use section::{partition, slugify, DocumentNode, NodeKind, Partition, Section};
