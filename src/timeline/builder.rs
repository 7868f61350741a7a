use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::error::{Result, TimelineError};
use crate::timeline::types::{FrameRecord, RawFrame};

/// Ordered, non-empty sequence of frames
///
/// The timeline is read-only once built, so it can be shared freely between threads
/// resolving different timestamps.
#[derive(Debug, Clone)]
pub struct Timeline {
    frames: Vec<FrameRecord>,
}

impl Timeline {
    /// Build a timeline from frames already in ascending native timestamp order.
    ///
    /// With `keyframes_only` set every non-keyframe is dropped first, which is what
    /// the split path always wants since only keyframes can start a stream-copy segment.
    /// Input is never re-sorted; an out-of-order frame is reported instead.
    pub fn build<I>(frames: I, keyframes_only: bool) -> std::result::Result<Self, TimelineError>
    where
        I: IntoIterator<Item = FrameRecord>,
    {
        let frames: Vec<FrameRecord> = frames
            .into_iter()
            .filter(|frame| !keyframes_only || frame.is_keyframe)
            .collect();

        if frames.is_empty() {
            return Err(TimelineError::Empty);
        }

        if let Some(position) = frames
            .windows(2)
            .position(|pair| pair[0].timestamp_timebase >= pair[1].timestamp_timebase)
        {
            return Err(TimelineError::OutOfOrder { index: position + 1 });
        }

        debug!(
            "Built timeline with {} frames ({:.3}s - {:.3}s)",
            frames.len(),
            frames[0].timestamp_micros as f64 / 1e6,
            frames[frames.len() - 1].timestamp_micros as f64 / 1e6
        );

        Ok(Self { frames })
    }

    /// Normalize raw probe frames and build a timeline from them.
    ///
    /// Frames with a negative timestamp are discarded before sequencing.
    pub fn from_raw(raw: &[RawFrame], keyframes_only: bool) -> Result<Self> {
        let mut records = Vec::with_capacity(raw.len());
        let mut discarded = 0usize;

        for frame in raw {
            if keyframes_only && !frame.key_frame {
                continue;
            }
            match FrameRecord::from_raw(frame)? {
                Some(record) => records.push(record),
                None => discarded += 1,
            }
        }

        if discarded > 0 {
            debug!("Discarded {} frames with negative timestamps", discarded);
        }

        Ok(Self::build(records, keyframes_only)?)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a timeline holds at least one frame
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> FrameRef<'_> {
        FrameRef { timeline: self, index: 0 }
    }

    pub fn last(&self) -> FrameRef<'_> {
        FrameRef {
            timeline: self,
            index: self.frames.len() - 1,
        }
    }

    pub fn get(&self, index: usize) -> Option<FrameRef<'_>> {
        (index < self.frames.len()).then_some(FrameRef { timeline: self, index })
    }

    pub fn iter(&self) -> impl Iterator<Item = FrameRef<'_>> + '_ {
        (0..self.frames.len()).map(move |index| FrameRef { timeline: self, index })
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Index of the first frame whose timestamp is `>= micros`, or `len()` if none is
    pub(crate) fn first_at_or_after(&self, micros: u64) -> usize {
        self.frames
            .partition_point(|frame| frame.timestamp_micros < micros)
    }
}

/// Cursor to one frame of a [`Timeline`]
///
/// Boundaries are explicit: the first frame has no `previous()` and the last frame
/// has no `next()`.
#[derive(Clone, Copy)]
pub struct FrameRef<'a> {
    timeline: &'a Timeline,
    index: usize,
}

impl<'a> FrameRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &'a FrameRecord {
        &self.timeline.frames[self.index]
    }

    pub fn timestamp_micros(&self) -> u64 {
        self.record().timestamp_micros
    }

    pub fn previous(&self) -> Option<FrameRef<'a>> {
        self.index
            .checked_sub(1)
            .map(|index| FrameRef { timeline: self.timeline, index })
    }

    pub fn next(&self) -> Option<FrameRef<'a>> {
        self.timeline.get(self.index + 1)
    }

    /// Point halfway between this frame and its successor.
    ///
    /// For the last frame there is no successor and the frame's own timestamp is returned.
    pub fn midpoint_to_next(&self) -> u64 {
        let here = self.timestamp_micros();
        match self.next() {
            Some(next) => here + (next.timestamp_micros().saturating_sub(here)) / 2,
            None => here,
        }
    }
}

impl fmt::Debug for FrameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRef")
            .field("index", &self.index)
            .field("record", self.record())
            .finish()
    }
}

impl PartialEq for FrameRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.record() == other.record()
    }
}

impl Eq for FrameRef<'_> {}

impl PartialOrd for FrameRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrameRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.record().cmp(other.record())
    }
}
