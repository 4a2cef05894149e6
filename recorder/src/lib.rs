//! Live pointer and keyboard capture.
//!
//! [`EventCapture`] owns the event buffer for a recording session. Platform
//! notifications arrive through an [`InputSource`] on its own thread and are
//! filtered and timestamped by a [`CaptureSink`].

pub mod capture;
pub mod listener;

pub use capture::{CaptureSink, EventCapture, MOVE_THRESHOLD};
pub use listener::{InputSource, ManualSource, RdevSource};
