// common/src/lib.rs
pub mod clock;
pub mod error;
pub mod keys;
pub mod models;
pub mod platform;
pub mod store;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use keys::{ButtonId, KeyId, NamedKey};
pub use models::*;
pub use store::*;
