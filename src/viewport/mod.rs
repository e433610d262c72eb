//! Display-surface plumbing.
//!
//! Tracks the size of the surface the views are drawn on and drives
//! animated scrolling on it. The terminal implementation lives in
//! [`terminal`]; everything else works against traits so it can run
//! without one.

pub mod scroll;
pub mod terminal;
pub mod tracker;

pub use scroll::{smooth_scroll_until, ScrollMotion, ScrollSurface, ScrollTarget};
pub use tracker::{Dimensions, DisplaySurface, ResizeBus, ViewportSubscription, ViewportTracker};
