//! # Keyframe Timeline
//!
//! An ordered, immutable sequence of frame records built once from the probe
//! transcript. Records are kept in strictly ascending native timestamp order and
//! can be navigated to their neighbours through [`FrameRef`].
//!
//! ```rust
//! use keyframe_splitter::timeline::{FrameRecord, Timeline};
//!
//! let timeline = Timeline::build(
//!     vec![
//!         FrameRecord::new(true, 0, 0),
//!         FrameRecord::new(false, 40_000, 1),
//!         FrameRecord::new(true, 2_000_000, 50),
//!     ],
//!     true,
//! ).unwrap();
//!
//! assert_eq!(timeline.len(), 2);
//! assert!(timeline.first().previous().is_none());
//! assert_eq!(timeline.first().next().unwrap().record().timestamp_micros, 2_000_000);
//! ```

pub mod builder;
pub mod types;

pub use builder::{FrameRef, Timeline};
pub use types::{FrameRecord, RawFrame};
