//! Chalkboard - narrated whiteboard lessons from source text
//!
//! Chalkboard chains AI-backed stages into a short illustrated lesson:
//!
//! 1. Extract teachable topics from the source text
//! 2. Plan five illustrations for the chosen topic
//! 3. Synthesize the illustrations concurrently and key out their white background
//! 4. Direct a scene manifest that references those illustrations
//! 5. Narrate the manifest and check the narration against the planned duration
//!
//! Every text stage goes through one generate / validate / retry engine, and
//! every provider (Gemini, any OpenAI-compatible endpoint, or the asynchronous
//! image tool) sits behind a small capability trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use chalkboard::{
//!     AiAgentsConfig, AssetPipeline, ChalkboardConfig, HttpProviderFactory, LessonOrchestrator,
//!     build_client,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ChalkboardConfig::load()?;
//! let factory = HttpProviderFactory::new(build_client(&config.http)?, config.narration.clone());
//! let orchestrator = LessonOrchestrator::new(
//!     Arc::new(factory),
//!     config.providers.defaults(),
//!     config.content.bounds(),
//!     AssetPipeline::from_config(&config.polling, &config.keying),
//! );
//!
//! let source = std::fs::read_to_string("chapter.txt")?;
//! let run = orchestrator.run(&source, 0, &AiAgentsConfig::default(), None).await?;
//! println!("{}", serde_json::to_string_pretty(run.bundle())?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `chalkboard_error` - Error types
//! - `chalkboard_core` - Data model, provider resolution, manifest validation
//! - `chalkboard_models` - Provider clients and configuration
//! - `chalkboard_pipeline` - Generation engine, asset pipeline, orchestration
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use observability::{LogConfig, init_logging};

pub use chalkboard_error::*;

pub use chalkboard_core::*;

pub use chalkboard_models::*;

pub use chalkboard_pipeline::*;
