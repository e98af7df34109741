//! Concurrent fan-out over asset tasks.

use super::poll::PollSchedule;
use super::task::AssetTask;
use chalkboard_core::ImageHints;
use chalkboard_error::{AssetError, AssetErrorKind};
use chalkboard_models::{ImageBackend, KeyingConfig, PollingConfig};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Runs one [`AssetTask`] per prompt, all at once.
#[derive(Debug, Clone)]
pub struct AssetPipeline {
    schedule: PollSchedule,
    keying: KeyingConfig,
}

impl AssetPipeline {
    /// Create a pipeline.
    pub fn new(schedule: PollSchedule, keying: KeyingConfig) -> Self {
        Self { schedule, keying }
    }

    /// Create a pipeline from configuration sections.
    pub fn from_config(polling: &PollingConfig, keying: &KeyingConfig) -> Self {
        Self::new(PollSchedule::from(polling), *keying)
    }

    /// Synthesize one transparent PNG per prompt, in prompt order.
    ///
    /// The first failure wins; sibling tasks still in flight are left to run
    /// out and their results are discarded.
    #[instrument(skip_all, fields(prompts = prompts.len(), provider = backend.provider_name()))]
    pub async fn synthesize(
        &self,
        prompts: &[String],
        backend: Arc<dyn ImageBackend>,
        hints: &ImageHints,
    ) -> Result<Vec<Vec<u8>>, AssetError> {
        let started = Instant::now();

        let handles = prompts.iter().enumerate().map(|(index, prompt)| {
            let task = AssetTask::new(index, prompt.clone(), hints.clone());
            let backend = Arc::clone(&backend);
            let schedule = self.schedule.clone();
            let keying = self.keying;
            let handle =
                tokio::spawn(async move { task.run(backend.as_ref(), &schedule, &keying).await });
            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(join_err) => Err(AssetError::new(AssetErrorKind::Aborted {
                        index,
                        message: join_err.to_string(),
                    })),
                }
            }
        });

        match try_join_all(handles).await {
            Ok(images) => {
                info!(
                    count = images.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Synthesized assets"
                );
                Ok(images)
            }
            Err(e) => {
                error!(code = e.kind.code(), error = %e.kind, "Asset synthesis failed");
                Err(e)
            }
        }
    }
}
