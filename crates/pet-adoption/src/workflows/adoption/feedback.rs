use std::fs::OpenOptions;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::domain::{AdopterId, PetId};
use crate::config::{FeedbackConfig, FeedbackSinkKind};

/// Destination for denial feedback. The mediator only depends on this capability.
pub trait FeedbackSender: Send + Sync {
    fn send_feedback(
        &self,
        adopter: &AdopterId,
        pet: &PetId,
        feedback: &str,
    ) -> Result<(), FeedbackError>;
}

/// Delivery failure. Never swallowed: denial requires the feedback to reach its sink.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("failed to append feedback to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write feedback to console: {0}")]
    Console(#[source] io::Error),
    #[error("feedback sink unavailable: {0}")]
    Unavailable(String),
}

/// Writes feedback to an interactive output surface.
pub struct ConsoleFeedbackAdapter<W: Write + Send> {
    writer: Mutex<W>,
}

impl ConsoleFeedbackAdapter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleFeedbackAdapter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> FeedbackSender for ConsoleFeedbackAdapter<W> {
    fn send_feedback(
        &self,
        adopter: &AdopterId,
        pet: &PetId,
        feedback: &str,
    ) -> Result<(), FeedbackError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| FeedbackError::Unavailable("console writer poisoned".to_string()))?;
        writeln!(writer, "[Console] Feedback to {adopter} about {pet}: {feedback}")
            .and_then(|_| writer.flush())
            .map_err(FeedbackError::Console)
    }
}

/// Appends one line per feedback to a durable log file.
#[derive(Debug, Clone)]
pub struct FileFeedbackAdapter {
    path: PathBuf,
}

impl FileFeedbackAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedbackSender for FileFeedbackAdapter {
    fn send_feedback(
        &self,
        adopter: &AdopterId,
        pet: &PetId,
        feedback: &str,
    ) -> Result<(), FeedbackError> {
        let to_io_error = |source| FeedbackError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_io_error)?;
        writeln!(file, "{adopter} - {pet}: {feedback}").map_err(to_io_error)?;

        debug!(path = %self.path.display(), %adopter, %pet, "feedback appended");
        Ok(())
    }
}

/// Sink selected from configuration at startup.
pub enum ConfiguredFeedbackSender {
    Console(ConsoleFeedbackAdapter<Stdout>),
    File(FileFeedbackAdapter),
}

impl ConfiguredFeedbackSender {
    pub fn from_config(config: &FeedbackConfig) -> Self {
        match config.sink {
            FeedbackSinkKind::Console => Self::Console(ConsoleFeedbackAdapter::stdout()),
            FeedbackSinkKind::File => Self::File(FileFeedbackAdapter::new(config.log_path.clone())),
        }
    }
}

impl FeedbackSender for ConfiguredFeedbackSender {
    fn send_feedback(
        &self,
        adopter: &AdopterId,
        pet: &PetId,
        feedback: &str,
    ) -> Result<(), FeedbackError> {
        match self {
            Self::Console(sink) => sink.send_feedback(adopter, pet, feedback),
            Self::File(sink) => sink.send_feedback(adopter, pet, feedback),
        }
    }
}
