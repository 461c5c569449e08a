//! The library code for the `blogroll` view engine and feed exporter. The
//! crate serves a static "facts" blog and breaks down into two halves:
//!
//! 1. The view engine: everything a page view needs to paginate, filter, and
//!    render posts ([`crate::session`] and the modules under it)
//! 2. The build-time feed exporter ([`crate::feed`])
//!
//! The view engine is deliberately platform-free. The original logic ran
//! directly against the browser DOM; here the same behavior is factored so
//! that a session owns the mutable state (cache, working set, cursor), pure
//! functions describe what to display ([`crate::render`]) and what actions a
//! click produces ([`crate::share`]), and a thin platform adapter applies
//! those descriptions to the real widget tree. The only seams the adapter
//! must implement are fetching the collection ([`crate::store::PostSource`])
//! and applying [`crate::scroll::Effect`]s and [`crate::share::ShareAction`]s.
//!
//! The feed exporter shares the post model and HTML utilities but is
//! otherwise independent: a single offline pass from the collection JSON to
//! the RSS document, driven by the `blogroll` binary.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod cursor;
pub mod feed;
pub mod filter;
pub mod html;
pub mod post;
pub mod render;
pub mod scroll;
pub mod session;
pub mod share;
pub mod store;
