//! Stub providers shared by the pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chalkboard_core::ResolvedProvider;
use chalkboard_error::{ConfigError, NarrationError, ProviderError, ProviderErrorKind};
use chalkboard_models::{
    CompletionRequest, ImageBackend, ImageRequest, JobHandle, JobStatus, NarrationProvider,
    ProviderFactory, SilentNarrator, Submission, TextGenerator,
};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Text generator answering from a per-call script.
pub struct ScriptedGenerator {
    script: Box<dyn Fn(usize, &CompletionRequest) -> Result<String, ProviderError> + Send + Sync>,
    calls: AtomicUsize,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGenerator {
    pub fn new(
        script: impl Fn(usize, &CompletionRequest) -> Result<String, ProviderError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_, _| Ok(text.clone()))
    }

    /// Answer with each entry in turn, repeating the last one.
    pub fn sequence(texts: Vec<String>) -> Self {
        Self::new(move |n, _| Ok(texts[n.min(texts.len() - 1)].clone()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        (self.script)(n, request)
    }
}

pub fn api_error(status: u16, message: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Api {
        provider: "scripted".to_string(),
        status,
        message: message.to_string(),
    })
}

/// A white PNG with a dark stroke across the middle row.
pub fn sketch_png() -> Vec<u8> {
    sketch_png_width(16)
}

/// Same sketch, `width` pixels wide.
pub fn sketch_png_width(width: u32) -> Vec<u8> {
    let mut img = RgbImage::from_pixel(width, 8, Rgb([255, 255, 255]));
    for x in 0..width {
        img.put_pixel(x, 4, Rgb([20, 20, 20]));
    }
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// How a stub image backend behaves for one prompt.
#[derive(Clone)]
pub enum ImageBehavior {
    Inline,
    Ready,
    /// Pending for `pending_polls` polls, then succeeds
    Job { pending_polls: usize },
    JobFails(String),
    SubmitError(u16),
    Garbage,
}

/// Sketch width for a prompt: `prompt-N` draws `10 + N` pixels wide.
pub fn sketch_width(prompt: &str) -> u32 {
    prompt
        .rsplit_once('-')
        .and_then(|(_, n)| n.parse::<u32>().ok())
        .map_or(16, |n| 10 + n)
}

/// Image backend whose behavior is chosen per prompt.
pub struct StubImageBackend {
    behavior: Box<dyn Fn(&str) -> ImageBehavior + Send + Sync>,
    polls: AtomicUsize,
    job_polls: Mutex<HashMap<String, usize>>,
    pub submitted: Mutex<Vec<String>>,
    pub downloaded: Mutex<Vec<String>>,
}

impl StubImageBackend {
    pub fn new(behavior: impl Fn(&str) -> ImageBehavior + Send + Sync + 'static) -> Self {
        Self {
            behavior: Box::new(behavior),
            polls: AtomicUsize::new(0),
            job_polls: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            downloaded: Mutex::new(Vec::new()),
        }
    }

    pub fn inline() -> Self {
        Self::new(|_| ImageBehavior::Inline)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageBackend for StubImageBackend {
    fn provider_name(&self) -> &'static str {
        "stub-image"
    }

    async fn submit(&self, request: &ImageRequest) -> Result<Submission, ProviderError> {
        self.submitted.lock().unwrap().push(request.prompt.clone());
        match (self.behavior)(&request.prompt) {
            ImageBehavior::Inline => Ok(Submission::Inline(sketch_png_width(sketch_width(
                &request.prompt,
            )))),
            ImageBehavior::Ready => Ok(Submission::Ready(format!("ready://{}", request.prompt))),
            ImageBehavior::Job { pending_polls } => Ok(Submission::Job(JobHandle(format!(
                "{}|{}",
                request.prompt, pending_polls
            )))),
            ImageBehavior::JobFails(message) => {
                Ok(Submission::Job(JobHandle(format!("fail|{}", message))))
            }
            ImageBehavior::SubmitError(status) => Err(api_error(status, "rejected")),
            ImageBehavior::Garbage => Ok(Submission::Inline(b"not a png".to_vec())),
        }
    }

    async fn poll(&self, job: &JobHandle) -> Result<JobStatus, ProviderError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let n = {
            let mut seen = self.job_polls.lock().unwrap();
            let count = seen.entry(job.0.clone()).or_insert(0);
            *count += 1;
            *count - 1
        };
        let (head, tail) = job.0.split_once('|').unwrap();
        if head == "fail" {
            return Ok(JobStatus::Failed(tail.to_string()));
        }
        let pending: usize = tail.parse().unwrap();
        if n < pending {
            Ok(JobStatus::Pending)
        } else {
            Ok(JobStatus::Succeeded {
                output_url: format!("job://{}", head),
            })
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let prompt = url.split_once("://").map_or(url, |(_, rest)| rest);
        self.downloaded.lock().unwrap().push(prompt.to_string());
        Ok(sketch_png_width(sketch_width(prompt)))
    }
}

/// Topic extractor response with one topic.
pub fn topics_json() -> String {
    json!({
        "topics": [{
            "title": "The Water Cycle",
            "focus": "How water moves between sea, sky and land",
            "hook": "The water you drink has been rain many times",
            "visualPotentialScore": 9,
            "keyVisuals": ["evaporation arrows", "cloud", "river"]
        }]
    })
    .to_string()
}

/// Image planner response with `count` prompts.
pub fn plan_json(count: usize) -> String {
    let images: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "purpose": format!("Beat {}", i),
                "layoutType": "Single",
                "imagePrompt": format!("sketch {}", i)
            })
        })
        .collect();
    json!({
        "storyboardOverview": {"totalImages": count, "visualFlow": "sea to sky to land"},
        "images": images
    })
    .to_string()
}

/// A valid two-scene manifest over `asset_0` and `asset_1`.
pub fn manifest_json() -> String {
    json!({
        "lessonDurationSec": 120,
        "scenes": [
            {
                "sceneId": "scene_1",
                "purpose": "Evaporation",
                "assetsUsed": ["asset_0"],
                "voiceover": [
                    {"text": "The sun warms the sea.", "checkpointId": "c1"},
                    {"text": "Water rises as vapour.", "checkpointId": "c2"}
                ],
                "events": [
                    {"type": "draw", "assetId": "asset_0", "checkpointId": "c1",
                     "zone": "centerMain", "role": "primaryDiagram", "scaleHint": "large"}
                ],
                "interaction": {"type": "none"}
            },
            {
                "sceneId": "scene_2",
                "purpose": "Rain",
                "assetsUsed": ["asset_1"],
                "voiceover": [{"text": "Clouds release rain.", "checkpointId": "c1"}],
                "events": [
                    {"type": "fadeIn", "assetId": "asset_1", "checkpointId": "c1",
                     "zone": "rightNotes", "role": "supportingDiagram", "scaleHint": "medium"}
                ],
                "interaction": {
                    "type": "quiz",
                    "prompt": "What lifts water into the sky?",
                    "options": ["The sun", "The wind"],
                    "correctAnswer": "The sun"
                }
            }
        ]
    })
    .to_string()
}

/// Factory handing out fixed stubs.
pub struct StubFactory {
    pub text: Arc<dyn TextGenerator>,
    pub images: Arc<dyn ImageBackend>,
    pub narrator: Arc<dyn NarrationProvider>,
}

impl StubFactory {
    pub fn silent(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageBackend>) -> Self {
        Self {
            text,
            images,
            narrator: Arc::new(SilentNarrator),
        }
    }
}

impl ProviderFactory for StubFactory {
    fn text_generator(
        &self,
        _resolved: &ResolvedProvider,
    ) -> Result<Arc<dyn TextGenerator>, ConfigError> {
        Ok(Arc::clone(&self.text))
    }

    fn image_backend(
        &self,
        _resolved: &ResolvedProvider,
    ) -> Result<Arc<dyn ImageBackend>, ConfigError> {
        Ok(Arc::clone(&self.images))
    }

    fn narrator(&self, _key_override: Option<&str>) -> Arc<dyn NarrationProvider> {
        Arc::clone(&self.narrator)
    }
}

/// Narrator returning fixed bytes.
pub struct FixedNarrator(pub Vec<u8>);

#[async_trait]
impl NarrationProvider for FixedNarrator {
    async fn narrate(&self, _segments: &[String]) -> Result<Vec<u8>, NarrationError> {
        Ok(self.0.clone())
    }
}
