//! # Keyframe Probing
//!
//! Runs the probing tool over the input video and turns its frame transcript into
//! [`RawFrame`](crate::timeline::RawFrame)s for the timeline builder.

pub mod ffprobe;

pub use ffprobe::{parse_frames, FfprobeProber};
