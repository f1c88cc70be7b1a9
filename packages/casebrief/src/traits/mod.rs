//! Core trait abstractions.
//!
//! The pipeline talks to the outside world only through these seams, so
//! tests can swap in the mocks from [`crate::testing`].

pub mod backend;
pub mod extractor;
pub mod locator;
pub mod source;
