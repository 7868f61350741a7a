use thiserror::Error;

/// Main error type for the keyframe splitter
#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Split plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Timestamp text that could not be normalized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Malformed timestamp '{input}': {reason}")]
    Format { input: String, reason: String },
}

/// Keyframe timeline construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("No eligible keyframes found")]
    Empty,

    #[error("Frame {index} is not after its predecessor in native timestamp order")]
    OutOfOrder { index: usize },
}

/// Split plan resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("No timestamps were provided to split at")]
    NoTimestampsProvided,
}

/// Errors reading the frame transcript produced by the probing tool
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Invalid probe output: {reason}")]
    InvalidOutput { reason: String },
}

/// External process errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{tool} is not available: {reason}")]
    NotAvailable { tool: String, reason: String },

    #[error("Failed to spawn {tool}: {reason}")]
    SpawnFailed { tool: String, reason: String },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {seconds}s")]
    TimedOut { tool: String, seconds: u64 },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using SplitterError
pub type Result<T> = std::result::Result<T, SplitterError>;

impl TimestampError {
    pub(crate) fn format<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::Format {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl SplitterError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Timestamp(TimestampError::Format { input, .. }) => {
                format!(
                    "Could not understand the timestamp '{}'. Use seconds (12.5) or HH:MM:SS[.fraction].",
                    input
                )
            }
            Self::Timeline(TimelineError::Empty) => {
                "No keyframes were found in the video stream.".to_string()
            }
            Self::Plan(PlanError::NoTimestampsProvided) => {
                "Give at least one timestamp to split at.".to_string()
            }
            Self::Probe(ProbeError::InputNotFound { path }) => {
                format!("Could not open '{}'. Please check the file exists.", path)
            }
            Self::Tool(ToolError::NotAvailable { tool, .. }) => {
                format!("'{}' was not found. Please install FFmpeg or set its path in the config.", tool)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let err: SplitterError = TimelineError::Empty.into();
        assert!(matches!(err, SplitterError::Timeline(TimelineError::Empty)));

        let err: SplitterError = PlanError::NoTimestampsProvided.into();
        assert!(matches!(err, SplitterError::Plan(PlanError::NoTimestampsProvided)));
    }

    #[test]
    fn test_user_message_mentions_input() {
        let err: SplitterError = TimestampError::format("1:xx", "not a number").into();
        assert!(err.user_message().contains("1:xx"));
        assert!(err.to_string().contains("not a number"));
    }
}
