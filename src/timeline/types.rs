use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::TimestampError;
use crate::timestamp::{microseconds_to_seconds, to_microseconds};

/// One frame as reported by the probing tool, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    /// Whether the frame is decodable on its own
    pub key_frame: bool,

    /// Presentation timestamp in decimal seconds, e.g. `"4.004000"`
    pub pts_time: String,

    /// Presentation timestamp in the stream's native timebase units
    pub pts: i64,
}

impl RawFrame {
    pub fn new<S: Into<String>>(key_frame: bool, pts_time: S, pts: i64) -> Self {
        Self {
            key_frame,
            pts_time: pts_time.into(),
            pts,
        }
    }

    /// Frames that start before the stream origin cannot be cut at
    pub fn is_negative(&self) -> bool {
        self.pts < 0 || self.pts_time.trim_start().starts_with('-')
    }
}

/// A normalized video frame on the timeline
///
/// Equality and ordering only consider `timestamp_timebase`: two frames that share a
/// microsecond value are still distinct as long as their native timestamps differ.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameRecord {
    pub is_keyframe: bool,

    /// Presentation timestamp truncated to microsecond resolution
    pub timestamp_micros: u64,

    /// Native integer timestamp used as the ordering key
    pub timestamp_timebase: u64,
}

impl FrameRecord {
    pub fn new(is_keyframe: bool, timestamp_micros: u64, timestamp_timebase: u64) -> Self {
        Self {
            is_keyframe,
            timestamp_micros,
            timestamp_timebase,
        }
    }

    /// Normalize a raw frame, returning `None` for frames with a negative timestamp
    pub fn from_raw(raw: &RawFrame) -> Result<Option<Self>, TimestampError> {
        if raw.is_negative() {
            return Ok(None);
        }

        let timestamp_micros = to_microseconds(&raw.pts_time)?;
        // Negative values were rejected above
        let timestamp_timebase = raw.pts as u64;

        Ok(Some(Self::new(raw.key_frame, timestamp_micros, timestamp_timebase)))
    }

    /// Timestamp as decimal seconds, ready to hand to the splitting tool
    pub fn timestamp_seconds(&self) -> String {
        microseconds_to_seconds(self.timestamp_micros)
    }
}

impl PartialEq for FrameRecord {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp_timebase == other.timestamp_timebase
    }
}

impl Eq for FrameRecord {}

impl PartialOrd for FrameRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrameRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp_timebase.cmp(&other.timestamp_timebase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_normalizes_timestamp() {
        let raw = RawFrame::new(true, "4.004000", 48048);
        let record = FrameRecord::from_raw(&raw).unwrap().unwrap();

        assert!(record.is_keyframe);
        assert_eq!(record.timestamp_micros, 4_004_000);
        assert_eq!(record.timestamp_timebase, 48048);
        assert_eq!(record.timestamp_seconds(), "4.004000");
    }

    #[test]
    fn test_from_raw_discards_negative_frames() {
        assert!(FrameRecord::from_raw(&RawFrame::new(true, "-0.033367", -400))
            .unwrap()
            .is_none());
        assert!(FrameRecord::from_raw(&RawFrame::new(true, "-0.000000", 0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_from_raw_rejects_malformed_time() {
        let raw = RawFrame::new(true, "N/A", 10);
        assert!(matches!(
            FrameRecord::from_raw(&raw),
            Err(TimestampError::Format { .. })
        ));
    }

    #[test]
    fn test_equality_uses_native_timestamp_only() {
        let a = FrameRecord::new(true, 1_000_000, 90_000);
        let b = FrameRecord::new(false, 1_000_000, 90_001);
        let c = FrameRecord::new(false, 7, 90_000);

        assert_ne!(a, b);
        assert_eq!(a, c);
        assert!(a < b);
    }
}
