use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlanError, Result};
use crate::timeline::{FrameRef, Timeline};
use crate::timestamp::{microseconds_to_seconds, to_microseconds};

/// Which keyframe wins when a requested time falls between two of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Closest keyframe; an exact tie goes to the earlier one
    #[default]
    Nearest,
    /// Keyframe at or before the requested time
    PreferBefore,
    /// Keyframe at or after the requested time
    PreferAfter,
}

/// Resolve every requested timestamp to a keyframe.
///
/// The result is ordered by native timestamp and holds each keyframe once, no matter
/// how many requests landed on it.
pub fn resolve<'a, S>(
    timeline: &'a Timeline,
    requested: &[S],
    tie_break: TieBreak,
) -> Result<Vec<FrameRef<'a>>>
where
    S: AsRef<str> + Sync,
{
    if requested.is_empty() {
        return Err(PlanError::NoTimestampsProvided.into());
    }

    let selections = requested
        .par_iter()
        .map(|text| {
            let micros = to_microseconds(text.as_ref())?;
            let selected = resolve_micros(timeline, micros, tie_break);
            debug!(
                "Requested {} resolved to keyframe {} ({:?})",
                text.as_ref(),
                selected.record().timestamp_seconds(),
                tie_break
            );
            Ok(selected)
        })
        .collect::<Result<Vec<_>>>()?;

    let unique: BTreeSet<FrameRef<'a>> = selections.into_iter().collect();
    if unique.len() < requested.len() {
        info!(
            "{} requested timestamps collapsed onto {} distinct keyframes",
            requested.len(),
            unique.len()
        );
    }

    Ok(unique.into_iter().collect())
}

/// Find the keyframe for a single time given in microseconds
pub fn resolve_micros(timeline: &Timeline, micros: u64, tie_break: TieBreak) -> FrameRef<'_> {
    let index = timeline.first_at_or_after(micros);

    // Past the final keyframe: the last segment is open-ended anyway
    let Some(current) = timeline.get(index) else {
        debug!(
            "{} is after the last keyframe, using {}",
            microseconds_to_seconds(micros),
            timeline.last().record().timestamp_seconds()
        );
        return timeline.last();
    };

    if current.timestamp_micros() == micros {
        return current;
    }

    // Before the first keyframe there is nothing earlier to pick
    let Some(previous) = current.previous() else {
        return current;
    };

    match tie_break {
        TieBreak::PreferAfter => current,
        TieBreak::PreferBefore => previous,
        TieBreak::Nearest => {
            let to_previous = micros - previous.timestamp_micros();
            let to_current = current.timestamp_micros() - micros;
            if to_previous <= to_current {
                previous
            } else {
                current
            }
        }
    }
}
