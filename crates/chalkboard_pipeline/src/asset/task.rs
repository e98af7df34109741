//! Per-prompt synthesis state machine.

use super::keying::key_background;
use super::poll::PollSchedule;
use chalkboard_core::ImageHints;
use chalkboard_error::{AssetError, AssetErrorKind, ProviderError};
use chalkboard_models::{ImageBackend, ImageRequest, JobHandle, JobStatus, KeyingConfig, Submission};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

/// Where an asset task stands.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
pub enum AssetState {
    /// Not yet submitted
    Queued,
    /// Backend accepted the prompt
    Submitted(Submission),
    /// Waiting on an asynchronous job
    Polling {
        /// Job being polled
        job: JobHandle,
        /// Polls already made
        attempt: u32,
        /// Time slept so far
        waited_ms: u64,
    },
    /// Job finished; output ready to fetch
    Completed {
        /// Output location
        output_url: String,
    },
    /// Raw image bytes in hand
    Downloaded(Vec<u8>),
    /// Transparent PNG ready
    Processed(Vec<u8>),
    /// Terminal failure
    Failed(AssetErrorKind),
}

impl AssetState {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetState::Processed(_) | AssetState::Failed(_))
    }
}

/// One prompt on its way to a transparent PNG.
#[derive(Debug, Clone, Getters)]
pub struct AssetTask {
    index: usize,
    prompt: String,
    hints: ImageHints,
    state: AssetState,
}

impl AssetTask {
    /// A queued task for prompt number `index`.
    pub fn new(index: usize, prompt: impl Into<String>, hints: ImageHints) -> Self {
        Self {
            index,
            prompt: prompt.into(),
            hints,
            state: AssetState::Queued,
        }
    }

    /// Drive the task to completion and return the keyed PNG.
    ///
    /// Nothing is retried: the first failure ends the task.
    #[instrument(skip_all, fields(index = self.index, provider = backend.provider_name()))]
    pub async fn run(
        mut self,
        backend: &dyn ImageBackend,
        schedule: &PollSchedule,
        keying: &KeyingConfig,
    ) -> Result<Vec<u8>, AssetError> {
        loop {
            let current = std::mem::replace(&mut self.state, AssetState::Queued);
            let label = current.to_string();
            match current {
                AssetState::Processed(png) => {
                    info!(bytes = png.len(), "Asset ready");
                    return Ok(png);
                }
                AssetState::Failed(kind) => return Err(AssetError::new(kind)),
                state => {
                    self.state = match self.advance(state, backend, schedule, keying).await {
                        Ok(next) => {
                            debug!(from = %label, to = %next, "Asset transition");
                            next
                        }
                        Err(kind) => {
                            warn!(stage = %kind.stage(), error = %kind, "Asset failed");
                            AssetState::Failed(kind)
                        }
                    };
                }
            }
        }
    }

    async fn advance(
        &self,
        state: AssetState,
        backend: &dyn ImageBackend,
        schedule: &PollSchedule,
        keying: &KeyingConfig,
    ) -> Result<AssetState, AssetErrorKind> {
        let index = self.index;
        match state {
            AssetState::Queued => {
                let request = ImageRequest {
                    prompt: self.prompt.clone(),
                    hints: self.hints.clone(),
                };
                let submission = backend.submit(&request).await.map_err(|e| {
                    classify(e, |message| AssetErrorKind::Submit { index, message })
                })?;
                Ok(AssetState::Submitted(submission))
            }
            AssetState::Submitted(Submission::Inline(bytes)) => Ok(AssetState::Downloaded(bytes)),
            AssetState::Submitted(Submission::Ready(output_url)) => {
                Ok(AssetState::Completed { output_url })
            }
            AssetState::Submitted(Submission::Job(job)) => Ok(AssetState::Polling {
                job,
                attempt: 0,
                waited_ms: 0,
            }),
            AssetState::Polling {
                job,
                attempt,
                waited_ms,
            } => {
                if attempt >= schedule.max_attempts() {
                    return Err(AssetErrorKind::Timeout {
                        index,
                        attempts: attempt,
                        waited_ms,
                    });
                }
                let delay = schedule.delay(attempt);
                tokio::time::sleep(delay).await;
                let waited_ms = waited_ms + delay.as_millis() as u64;

                let status = backend.poll(&job).await.map_err(|e| {
                    classify(e, |message| AssetErrorKind::JobFailed { index, message })
                })?;
                match status {
                    JobStatus::Pending => Ok(AssetState::Polling {
                        job,
                        attempt: attempt + 1,
                        waited_ms,
                    }),
                    JobStatus::Succeeded { output_url } => {
                        Ok(AssetState::Completed { output_url })
                    }
                    JobStatus::Failed(message) => Err(AssetErrorKind::JobFailed { index, message }),
                }
            }
            AssetState::Completed { output_url } => {
                let bytes = backend.download(&output_url).await.map_err(|e| {
                    classify(e, |message| AssetErrorKind::Download { index, message })
                })?;
                Ok(AssetState::Downloaded(bytes))
            }
            AssetState::Downloaded(bytes) => key_background(&bytes, keying)
                .map(AssetState::Processed)
                .map_err(|message| AssetErrorKind::Processing { index, message }),
            terminal => Ok(terminal),
        }
    }
}

/// Credential rejections get their own kind; everything else is tagged by stage.
fn classify(err: ProviderError, stage: impl FnOnce(String) -> AssetErrorKind) -> AssetErrorKind {
    if err.kind.is_credential_failure() {
        AssetErrorKind::InvalidCredentials(err.kind.to_string())
    } else {
        stage(err.kind.to_string())
    }
}
