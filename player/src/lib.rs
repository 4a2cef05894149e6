//! Timing-faithful replay of recorded input.
//!
//! [`PlaybackEngine`] walks a loaded recording on the calling thread, sleeping
//! through a [`Clock`](interactflow_common::Clock) between events and handing
//! each one to an [`InputInjector`]. A failed event is logged and skipped;
//! cancellation through [`PlaybackHandle`] lands between events.

pub mod engine;
pub mod injector;

pub use engine::{PlaybackEngine, PlaybackHandle, PlaybackReport};
pub use injector::{DryRunInjector, InputInjector, RdevInjector};
