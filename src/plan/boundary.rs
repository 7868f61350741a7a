use serde::{Serialize, Serializer};

use crate::timeline::FrameRef;
use crate::timestamp::microseconds_to_seconds;

/// One output range of the source, cut by stream copy
///
/// A missing start means "from the beginning", a missing end means "to the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// 1-based position in the output
    pub number: usize,

    #[serde(rename = "start", serialize_with = "serialize_seconds")]
    pub start_micros: Option<u64>,

    #[serde(rename = "end", serialize_with = "serialize_seconds")]
    pub end_micros: Option<u64>,
}

impl Segment {
    pub fn start_seconds(&self) -> Option<String> {
        self.start_micros.map(microseconds_to_seconds)
    }

    pub fn end_seconds(&self) -> Option<String> {
        self.end_micros.map(microseconds_to_seconds)
    }
}

fn serialize_seconds<S: Serializer>(micros: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    micros.map(microseconds_to_seconds).serialize(serializer)
}

/// Turn ordered, distinct split keyframes into `n + 1` segments.
///
/// Each segment ends on a split keyframe. The following segment starts halfway to
/// the keyframe after it, so the split keyframe lands in exactly one output.
pub fn derive_segments(split_points: &[FrameRef<'_>]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(split_points.len() + 1);
    let mut start_micros = None;

    for (i, point) in split_points.iter().enumerate() {
        segments.push(Segment {
            number: i + 1,
            start_micros,
            end_micros: Some(point.timestamp_micros()),
        });
        start_micros = Some(point.midpoint_to_next());
    }

    segments.push(Segment {
        number: split_points.len() + 1,
        start_micros,
        end_micros: None,
    });

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{FrameRecord, Timeline};

    fn timeline(seconds: &[u64]) -> Timeline {
        let frames = seconds
            .iter()
            .map(|&s| FrameRecord::new(true, s * 1_000_000, s * 90_000));
        Timeline::build(frames, true).unwrap()
    }

    #[test]
    fn test_midpoint_start_boundary() {
        let timeline = timeline(&[0, 10, 12, 20]);
        let points = vec![timeline.get(1).unwrap()];

        let segments = derive_segments(&points);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_seconds(), None);
        assert_eq!(segments[0].end_seconds().as_deref(), Some("10.000000"));
        assert_eq!(segments[1].start_seconds().as_deref(), Some("11.000000"));
        assert_eq!(segments[1].end_seconds(), None);
    }

    #[test]
    fn test_n_points_make_n_plus_one_segments() {
        let timeline = timeline(&[0, 2, 4, 6, 8]);
        let points: Vec<_> = [1, 2, 4].iter().map(|&i| timeline.get(i).unwrap()).collect();

        let segments = derive_segments(&points);
        let ranges: Vec<_> = segments
            .iter()
            .map(|s| (s.number, s.start_micros, s.end_micros))
            .collect();

        assert_eq!(
            ranges,
            vec![
                (1, None, Some(2_000_000)),
                (2, Some(3_000_000), Some(4_000_000)),
                (3, Some(5_000_000), Some(8_000_000)),
                (4, Some(8_000_000), None),
            ]
        );
    }

    #[test]
    fn test_split_on_last_keyframe_starts_at_itself() {
        let timeline = timeline(&[0, 5]);
        let points = vec![timeline.last()];

        let segments = derive_segments(&points);
        assert_eq!(segments[1].start_micros, Some(5_000_000));
    }

    #[test]
    fn test_no_points_is_single_whole_segment() {
        let segments = derive_segments(&[]);
        assert_eq!(
            segments,
            vec![Segment {
                number: 1,
                start_micros: None,
                end_micros: None,
            }]
        );
    }

    #[test]
    fn test_segment_serializes_as_seconds() {
        let segment = Segment {
            number: 2,
            start_micros: Some(11_000_000),
            end_micros: None,
        };

        let json = serde_json::to_value(segment).unwrap();
        assert_eq!(json["start"], "11.000000");
        assert!(json["end"].is_null());
        assert_eq!(json["number"], 2);
    }
}
