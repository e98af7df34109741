//! Asynchronous image-tool REST client.
//!
//! Jobs are created with `POST {base}/api/un-api/create_tool_task` and
//! queried with `POST {base}/api/un-api/query_tool_task_status`. A status of
//! `1` means done, `-1` means failed, anything else is still running.

use crate::http::{check_status, download_bytes, read_json, transport_error, trim_base};
use crate::{ImageBackend, ImageRequest, JobHandle, JobStatus, Submission};
use async_trait::async_trait;
use chalkboard_error::{ProviderError, ProviderErrorKind};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const PROVIDER: &str = "image-tool";
const DEFAULT_ASPECT_RATIO: &str = "auto";
const DEFAULT_RESOLUTION: &str = "1K";

/// Tool type of the pro tier.
pub const PRO_TOOL_MODEL: &str = "nano-banana-image-pro-api";

/// Estimated credit cost of one task for a tool type.
pub fn estimated_credits(model: &str) -> u32 {
    if model == PRO_TOOL_MODEL { 150 } else { 50 }
}

#[derive(Debug, Serialize)]
struct CreateTaskRequest<'a> {
    tool_type: &'a str,
    input: TaskInput<'a>,
}

#[derive(Debug, Serialize)]
struct TaskInput<'a> {
    prompt: &'a str,
    aspect_ratio: &'a str,
    resolution: &'a str,
    #[serde(skip_serializing_if = "no_references")]
    image_list: &'a [String],
}

fn no_references(list: &&[String]) -> bool {
    list.is_empty()
}

#[derive(Debug, Serialize)]
struct QueryTaskRequest<'a> {
    task_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedTask {
    #[serde(default)]
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskState {
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    output_urls: Vec<String>,
    #[serde(default, alias = "errorMsg")]
    error_msg: Option<String>,
}

/// Image-tool client.
#[derive(Debug, Clone)]
pub struct ImageToolClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    image_list: Vec<String>,
}

impl ImageToolClient {
    /// Create a client on the shared connection pool.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        image_list: Vec<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            image_list,
        }
    }

    async fn call<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", trim_base(&self.base_url), path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let status = response.status().as_u16();
        let response = check_status(PROVIDER, response).await?;
        let envelope: Envelope<T> = read_json(PROVIDER, response).await?;

        if !envelope.success {
            return Err(ProviderError::new(ProviderErrorKind::Api {
                provider: PROVIDER.to_string(),
                status,
                message: envelope
                    .error_msg
                    .unwrap_or_else(|| "request reported success=false".to_string()),
            }));
        }
        envelope.data.ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::MissingContent {
                provider: PROVIDER.to_string(),
                message: format!("{} response missing data", path),
            })
        })
    }

    /// Resolve a possibly relative output URL against the base URL.
    pub fn absolute_url(&self, output: &str) -> Result<String, ProviderError> {
        if Url::parse(output).is_ok() {
            return Ok(output.to_string());
        }
        let base = format!("{}/", trim_base(&self.base_url));
        Url::parse(&base)
            .and_then(|base| base.join(output.trim_start_matches('/')))
            .map(String::from)
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::InvalidRequest {
                    provider: PROVIDER.to_string(),
                    message: format!("cannot resolve output url '{}': {}", output, e),
                })
            })
    }
}

#[async_trait]
impl ImageBackend for ImageToolClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn submit(&self, request: &ImageRequest) -> Result<Submission, ProviderError> {
        if request.prompt.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::InvalidRequest {
                provider: PROVIDER.to_string(),
                message: "prompt must be non-empty".to_string(),
            }));
        }

        let aspect_ratio = request
            .hints
            .aspect_ratio
            .as_deref()
            .unwrap_or(DEFAULT_ASPECT_RATIO);
        let resolution = request.hints.size.as_deref().unwrap_or(DEFAULT_RESOLUTION);
        info!(
            aspect_ratio,
            resolution,
            estimated_credits = estimated_credits(&self.model),
            "Creating image task"
        );

        let body = CreateTaskRequest {
            tool_type: &self.model,
            input: TaskInput {
                prompt: &request.prompt,
                aspect_ratio,
                resolution,
                image_list: &self.image_list,
            },
        };
        let created: CreatedTask = self.call("/api/un-api/create_tool_task", &body).await?;
        let task_id = created.task_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::MissingContent {
                provider: PROVIDER.to_string(),
                message: "create_tool_task response missing task_id".to_string(),
            })
        })?;

        debug!(task_id = %task_id, "Image task created");
        Ok(Submission::Job(JobHandle(task_id)))
    }

    #[instrument(skip(self), fields(job = %job))]
    async fn poll(&self, job: &JobHandle) -> Result<JobStatus, ProviderError> {
        let state: TaskState = self
            .call(
                "/api/un-api/query_tool_task_status",
                &QueryTaskRequest { task_id: &job.0 },
            )
            .await?;

        debug!(status = ?state.status, "Polled image task");
        match state.status {
            Some(1) => match state.output_urls.into_iter().next() {
                Some(output) => Ok(JobStatus::Succeeded {
                    output_url: self.absolute_url(&output)?,
                }),
                None => Ok(JobStatus::Failed(
                    "task completed without output_urls".to_string(),
                )),
            },
            Some(-1) => {
                let message = state.error_msg.unwrap_or_else(|| "Unknown error".to_string());
                warn!(error = %message, "Image task failed");
                Ok(JobStatus::Failed(message))
            }
            _ => Ok(JobStatus::Pending),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let url = self.absolute_url(url)?;
        download_bytes(&self.client, PROVIDER, &url).await
    }
}
