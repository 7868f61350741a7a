//! ffprobe-backed keyframe probing.
//!
//! Shells out to `ffprobe -show_frames -skip_frame nokey` and maps the JSON
//! transcript into [`RawFrame`]s.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ToolsConfig;
use crate::error::{ProbeError, Result};
use crate::timeline::RawFrame;
use crate::tool::ToolCommand;

/// Keyframe prober backed by the `ffprobe` CLI
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new<P: Into<PathBuf>>(ffprobe_path: P, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(
            tools.ffprobe.clone(),
            Duration::from_secs(tools.probe_timeout_secs),
        )
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }

    /// The invocation that lists the keyframes of the first video stream
    pub fn command(&self, input: &Path) -> ToolCommand {
        let mut command = ToolCommand::new(self.ffprobe_path.clone());
        command
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_frames",
                "-skip_frame", "nokey",
                "-select_streams", "v:0",
            ])
            .arg(input)
            .timeout(self.timeout);
        command
    }

    /// Probe `input` and return its frames in stream order
    pub async fn probe_frames(&self, input: &Path) -> Result<Vec<RawFrame>> {
        if tokio::fs::metadata(input).await.is_err() {
            return Err(ProbeError::InputNotFound {
                path: input.display().to_string(),
            }
            .into());
        }

        info!("Probing keyframes of {:?}", input);
        let output = self.command(input).execute().await?;
        let frames = parse_frames(&output.stdout)?;

        info!("ffprobe reported {} frames", frames.len());
        Ok(frames)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    frames: Vec<FfprobeFrame>,
}

/// Recent ffprobe releases report `pts`/`pts_time`; older ones only `pkt_pts`/`pkt_pts_time`.
#[derive(Debug, Deserialize)]
struct FfprobeFrame {
    #[serde(default)]
    key_frame: u8,
    pts: Option<i64>,
    pts_time: Option<String>,
    pkt_pts: Option<i64>,
    pkt_pts_time: Option<String>,
}

impl FfprobeFrame {
    fn into_raw(self) -> Option<RawFrame> {
        let pts = self.pts.or(self.pkt_pts)?;
        let pts_time = self.pts_time.or(self.pkt_pts_time)?;
        Some(RawFrame::new(self.key_frame == 1, pts_time, pts))
    }
}

/// Parse an ffprobe `-show_frames` JSON transcript.
///
/// Frames without a presentation timestamp are skipped.
pub fn parse_frames(json: &str) -> std::result::Result<Vec<RawFrame>, ProbeError> {
    let output: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| ProbeError::InvalidOutput {
            reason: format!("ffprobe JSON parse error: {}", e),
        })?;

    let total = output.frames.len();
    let frames: Vec<RawFrame> = output
        .frames
        .into_iter()
        .filter_map(FfprobeFrame::into_raw)
        .collect();

    if frames.len() < total {
        debug!("Skipped {} frames without a timestamp", total - frames.len());
    }

    Ok(frames)
}
