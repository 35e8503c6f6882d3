//! Scroll-reveal visibility tracking.
//!
//! ```text
//!   ObserverHost ──connect──▶ Observer ──(node, ratio) batches──▶ EntrySink
//!                                                                     │
//!   section ──attach/detach──▶ RevealTracker ◀──────pump──────────────┘
//!                                   │
//!                              is_revealed(id)
//! ```
//!
//! One generic tracker serves every section. The host is whatever the
//! environment offers: [`LayoutObserverHost`] for front-ends that know their
//! own layout, the browser `IntersectionObserver` in the wasm bridge, or
//! [`UnavailableHost`], under which trackers fail open.

pub mod layout;
pub mod observer;
pub mod tracker;

use thiserror::Error;

pub use layout::LayoutObserverHost;
pub use observer::{
    EntrySink, IntersectionEntry, NodeHandle, Observer, ObserverHost, Threshold, UnavailableHost,
};
pub use tracker::{RevealTracker, VisibilitySet};

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum RevealError {
    #[error("reveal threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}
