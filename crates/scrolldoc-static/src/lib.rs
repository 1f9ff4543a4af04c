//! Static site generator for scrolldoc documentation.
//!
//! Builds sectioned single-page documentation from markdown, pre-rendering the
//! sidebar and section containers that the browser runtime navigates.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
