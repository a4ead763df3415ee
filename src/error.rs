use std::{error::Error, io, path::PathBuf};

use glint_api::ShaderStage;
use thiserror::Error;

/// Failures met while building a [`ShaderProgram`](crate::ShaderProgram).
///
/// These are reported to the log as they happen; construction itself always succeeds.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("Cannot read shader source {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot compile {stage} shader:\n{info_log}")]
    Compile {
        stage: ShaderStage,
        info_log: String,
    },
    #[error("Cannot link shader program:\n{info_log}")]
    Link { info_log: String },
    #[error("Graphics driver error: {0}")]
    Driver(#[source] Box<dyn Error + Send + Sync>),
}

impl ProgramError {
    pub(crate) fn driver(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Driver(Box::new(err))
    }

    /// Fixed first line of the diagnostic emitted for this failure.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Read { .. } => "ERROR::SHADER::FILE_NOT_SUCCESSFULLY_READ",
            Self::Compile { .. } => "ERROR::SHADER::COMPILATION_FAILED",
            Self::Link { .. } => "ERROR::SHADER::PROGRAM::LINK_FAILED",
            Self::Driver(_) => "ERROR::SHADER::DRIVER",
        }
    }

    pub(crate) fn report(&self) {
        match self {
            Self::Read { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "{}", self.tag())
            }
            Self::Compile { stage, info_log } => {
                tracing::error!(%stage, "{}\n{}", self.tag(), info_log.trim_end())
            }
            Self::Link { info_log } => tracing::error!("{}\n{}", self.tag(), info_log.trim_end()),
            Self::Driver(err) => tracing::error!(error = %err, "{}", self.tag()),
        }
    }
}
