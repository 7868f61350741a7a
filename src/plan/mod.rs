//! # Split Plan
//!
//! Maps requested timestamps onto keyframes and derives the segment boundaries
//! handed to the stream-copy splitter.
//!
//! ```rust
//! use keyframe_splitter::plan::{SplitPlan, TieBreak};
//! use keyframe_splitter::timeline::{FrameRecord, Timeline};
//!
//! let timeline = Timeline::build(
//!     [0, 10, 12].iter().map(|&s| FrameRecord::new(true, s * 1_000_000, s * 90_000)),
//!     true,
//! ).unwrap();
//!
//! let plan = SplitPlan::resolve(&timeline, &["9.7"], TieBreak::Nearest).unwrap();
//! assert_eq!(plan.segments.len(), 2);
//! assert_eq!(plan.segments[1].start_seconds().as_deref(), Some("11.000000"));
//! ```

pub mod boundary;
pub mod resolver;

pub use boundary::{derive_segments, Segment};
pub use resolver::{resolve, resolve_micros, TieBreak};

use serde::Serialize;

use crate::error::Result;
use crate::timeline::{FrameRecord, Timeline};

/// The complete, consistent result of resolving a split request
#[derive(Debug, Clone, Serialize)]
pub struct SplitPlan {
    /// Keyframes chosen as cut points, ordered and distinct
    pub split_points: Vec<FrameRecord>,

    /// Output segments in source order; always `split_points.len() + 1` entries
    pub segments: Vec<Segment>,
}

impl SplitPlan {
    /// Resolve the requested timestamps and derive the segments in one step
    pub fn resolve<S>(timeline: &Timeline, requested: &[S], tie_break: TieBreak) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        let points = resolve(timeline, requested, tie_break)?;
        let segments = derive_segments(&points);

        Ok(Self {
            split_points: points.iter().map(|point| *point.record()).collect(),
            segments,
        })
    }

    /// Split points as decimal-seconds text
    pub fn split_seconds(&self) -> Vec<String> {
        self.split_points
            .iter()
            .map(FrameRecord::timestamp_seconds)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline(seconds: &[u64]) -> Timeline {
        Timeline::build(
            seconds
                .iter()
                .map(|&s| FrameRecord::new(true, s * 1_000_000, s * 90_000)),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_deduplicated_requests_make_n_plus_one_segments() {
        let timeline = timeline(&[0, 4, 8, 12, 16]);
        let plan = SplitPlan::resolve(&timeline, &["4.1", "3.9", "12", "0:11.8"], TieBreak::Nearest).unwrap();

        assert_eq!(plan.split_seconds(), vec!["4.000000", "12.000000"]);
        assert_eq!(plan.segments.len(), 3);
        assert_eq!(plan.segments[1].start_seconds().as_deref(), Some("6.000000"));
        assert_eq!(plan.segments[1].end_seconds().as_deref(), Some("12.000000"));
        assert_eq!(plan.segments[2].start_seconds().as_deref(), Some("14.000000"));
    }

    #[test]
    fn test_plan_serializes_to_json() {
        let timeline = timeline(&[0, 10, 12]);
        let plan = SplitPlan::resolve(&timeline, &["10"], TieBreak::PreferAfter).unwrap();

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["split_points"][0]["timestamp_micros"], 10_000_000);
        assert_eq!(json["segments"][1]["start"], "11.000000");
    }
}
