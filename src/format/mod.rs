//! Display transformers.
//!
//! Pure conversions from raw upstream values to the strings shown on
//! screen.

pub mod reading_time;
pub mod timestamp;

pub use reading_time::{bucket_reading_time, DEFAULT_GLYPH};
pub use timestamp::{format_timestamp, Timestamp};
