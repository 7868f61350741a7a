//! # Stream-Copy Splitting
//!
//! Turns a [`SplitPlan`] into one ffmpeg invocation per segment. Every invocation
//! copies the compressed streams unchanged (`-codec copy`), which is why cut points
//! have to line up with keyframes in the first place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::plan::{Segment, SplitPlan};
use crate::tool::{self, ToolCommand};

/// A segment together with the command that extracts it
#[derive(Debug, Clone)]
pub struct SegmentJob {
    pub segment: Segment,
    pub output: PathBuf,
    pub command: ToolCommand,
}

/// Stream-copy splitter backed by the `ffmpeg` CLI
#[derive(Debug, Clone)]
pub struct FfmpegSplitter {
    ffmpeg_path: PathBuf,
    timeout: Duration,
    part_suffix: String,
    extension: String,
    overwrite: bool,
}

impl FfmpegSplitter {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ffmpeg_path: config.tools.ffmpeg.clone(),
            timeout: Duration::from_secs(config.tools.split_timeout_secs),
            part_suffix: config.split.part_suffix.clone(),
            extension: config.split.extension.clone(),
            overwrite: config.split.overwrite,
        }
    }

    /// Output file for the 1-based segment `number`, next to the input
    pub fn output_path(&self, input: &Path, number: usize) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let file_name = format!("{}{}{}.{}", stem, self.part_suffix, number, self.extension);

        match input.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Build the ffmpeg invocation for one segment.
    ///
    /// Both cut options are given as input options, so they refer to positions in the
    /// source rather than in the output.
    pub fn command(&self, input: &Path, segment: &Segment, output: &Path) -> ToolCommand {
        let mut command = ToolCommand::new(self.ffmpeg_path.clone());
        command.arg(if self.overwrite { "-y" } else { "-n" });

        if let Some(start) = segment.start_seconds() {
            command.args(["-ss", start.as_str()]);
        }
        if let Some(end) = segment.end_seconds() {
            command.args(["-to", end.as_str()]);
        }

        command
            .arg("-i")
            .arg(input)
            .args(["-codec", "copy"])
            .arg(output)
            .timeout(self.timeout);
        command
    }

    /// One job per segment, in source order
    pub fn jobs(&self, input: &Path, plan: &SplitPlan) -> Vec<SegmentJob> {
        plan.segments
            .iter()
            .map(|segment| {
                let output = self.output_path(input, segment.number);
                let command = self.command(input, segment, &output);
                SegmentJob {
                    segment: *segment,
                    output,
                    command,
                }
            })
            .collect()
    }

    /// Extract every segment of the plan, stopping at the first failure
    pub async fn split(&self, input: &Path, plan: &SplitPlan) -> Result<Vec<PathBuf>> {
        tool::check_available(&self.ffmpeg_path).await?;

        let jobs = self.jobs(input, plan);
        let total = jobs.len();
        let mut outputs = Vec::with_capacity(total);

        for job in jobs {
            info!(
                "Writing segment {}/{} ({} - {}) to {:?}",
                job.segment.number,
                total,
                job.segment.start_seconds().as_deref().unwrap_or("start"),
                job.segment.end_seconds().as_deref().unwrap_or("end"),
                job.output
            );
            job.command.execute().await?;
            outputs.push(job.output);
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::TieBreak;
    use crate::timeline::{FrameRecord, Timeline};

    fn splitter() -> FfmpegSplitter {
        FfmpegSplitter::from_config(&Config::default())
    }

    fn plan(seconds: &[u64], requested: &[&str]) -> SplitPlan {
        let timeline = Timeline::build(
            seconds
                .iter()
                .map(|&s| FrameRecord::new(true, s * 1_000_000, s * 90_000)),
            true,
        )
        .unwrap();
        SplitPlan::resolve(&timeline, requested, TieBreak::Nearest).unwrap()
    }

    #[test]
    fn test_output_path_next_to_input() {
        let splitter = splitter();

        assert_eq!(
            splitter.output_path(Path::new("/videos/holiday.mkv"), 2),
            PathBuf::from("/videos/holiday-part2.mp4")
        );
        assert_eq!(
            splitter.output_path(Path::new("holiday.mp4"), 1),
            PathBuf::from("holiday-part1.mp4")
        );
    }

    #[test]
    fn test_jobs_arguments() {
        let plan = plan(&[0, 10, 12, 20], &["10"]);
        let jobs = splitter().jobs(Path::new("/v/in.mp4"), &plan);

        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].command.to_string(),
            "ffmpeg -y -to 10.000000 -i /v/in.mp4 -codec copy /v/in-part1.mp4"
        );
        assert_eq!(
            jobs[1].command.to_string(),
            "ffmpeg -y -ss 11.000000 -i /v/in.mp4 -codec copy /v/in-part2.mp4"
        );
    }

    #[test]
    fn test_middle_segment_has_both_cuts() {
        let plan = plan(&[0, 4, 8, 12], &["4", "8"]);
        let jobs = splitter().jobs(Path::new("in.mp4"), &plan);

        assert_eq!(jobs.len(), 3);
        assert_eq!(
            jobs[1].command.to_string(),
            "ffmpeg -y -ss 6.000000 -to 8.000000 -i in.mp4 -codec copy in-part2.mp4"
        );
    }

    #[test]
    fn test_no_overwrite_flag() {
        let mut config = Config::default();
        config.split.overwrite = false;
        config.split.extension = "mkv".to_string();
        let splitter = FfmpegSplitter::from_config(&config);

        let plan = plan(&[0, 5], &["5"]);
        let jobs = splitter.jobs(Path::new("in.mkv"), &plan);
        assert!(jobs[0].command.to_string().starts_with("ffmpeg -n "));
        assert_eq!(jobs[1].output, PathBuf::from("in-part2.mkv"));
    }
}
