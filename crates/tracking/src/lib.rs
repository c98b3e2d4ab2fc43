//! Customer-facing order tracking.

pub mod reader;

pub use reader::{LookupKey, TrackingError, TrackingReader, TrackingView};
