//! # Keyframe-Splitter
//!
//! Split a video losslessly at the keyframes closest to the timestamps you ask for.
//!
//! Stream copy (`ffmpeg -codec copy`) can only start a new segment on a keyframe, so
//! requested times are first snapped onto the keyframes reported by `ffprobe`, and the
//! segment boundaries are derived from those keyframes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use keyframe_splitter::{
//!     config::Config,
//!     plan::{SplitPlan, TieBreak},
//!     probe::FfprobeProber,
//!     split::FfmpegSplitter,
//!     timeline::Timeline,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let input = Path::new("movie.mp4");
//!
//! let frames = FfprobeProber::from_config(&config.tools).probe_frames(input).await?;
//! let timeline = Timeline::from_raw(&frames, true)?;
//! let plan = SplitPlan::resolve(&timeline, &["12:30", "1:40:19.5"], TieBreak::Nearest)?;
//!
//! FfmpegSplitter::from_config(&config).split(input, &plan).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`timestamp`] - Time text to microseconds and back
//! - [`timeline`] - Ordered keyframe timeline with neighbour navigation
//! - [`plan`] - Keyframe resolution and segment boundaries
//! - [`probe`] - Keyframe listing through ffprobe
//! - [`split`] - Stream-copy extraction through ffmpeg
//! - [`config`] - Configuration management

pub mod config;
pub mod error;
pub mod plan;
pub mod probe;
pub mod split;
pub mod timeline;
pub mod timestamp;
pub mod tool;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, SplitterError},
    plan::{SplitPlan, TieBreak},
    timeline::{FrameRecord, Timeline},
};
