//! View-state layer - scrolling and visible range management
//!
//! # Module Structure
//!
//! - `types`: LineHeight newtype
//! - `visible_range`: VisibleRange and the scroll-offset to line-range mapping
//! - `viewport`: ViewportState - scroll position and navigation
//! - `debounce`: ScrollDebouncer - collapses bursts of scroll events

pub mod debounce;
pub mod types;
pub mod viewport;
pub mod visible_range;

pub use debounce::{ScrollDebouncer, DEFAULT_SCROLL_DEBOUNCE};
pub use types::{InvalidLineHeight, LineHeight};
pub use viewport::ViewportState;
pub use visible_range::{compute_visible_range, VisibleRange};
