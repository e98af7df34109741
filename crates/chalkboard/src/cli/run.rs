//! Command handlers.

use super::output::{load_agents, print_json, read_text, write_assets, write_bundle};
use super::{Cli, Commands};
use chalkboard::{
    AiAgentsConfig, AssetPipeline, ChalkboardConfig, ChalkboardResult, HttpProviderFactory,
    LessonOrchestrator, asset_id, build_client,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Everything a command needs.
struct App {
    orchestrator: LessonOrchestrator,
    agents: AiAgentsConfig,
}

impl App {
    fn new(cli: &Cli) -> ChalkboardResult<Self> {
        let config = match &cli.config {
            Some(path) => ChalkboardConfig::from_file(path)?,
            None => ChalkboardConfig::load()?,
        };
        let agents = load_agents(cli.provider_config.as_deref(), &config)?;

        let factory = HttpProviderFactory::new(build_client(&config.http)?, config.narration.clone());
        let orchestrator = LessonOrchestrator::new(
            Arc::new(factory),
            config.providers.defaults(),
            config.content.bounds(),
            AssetPipeline::from_config(&config.polling, &config.keying),
        );
        Ok(Self {
            orchestrator,
            agents,
        })
    }
}

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> ChalkboardResult<()> {
    let app = App::new(&cli)?;
    let orchestrator = &app.orchestrator;
    let agents = &app.agents;

    match cli.command {
        Commands::Analyze { input } => {
            let text = read_text(&input)?;
            let topics = orchestrator.analyze(&text, agents).await?;
            print_json(&json!(topics));
        }

        Commands::Prompts { topic } => {
            let topic_text = read_text(&topic)?;
            let plan = orchestrator.plan_prompts(&topic_text, agents).await?;
            print_json(&json!(plan));
        }

        Commands::Assets { topic, out } => {
            let topic_text = read_text(&topic)?;
            let (plan, assets) = orchestrator.generate_assets(&topic_text, agents).await?;
            let storyboard = json!({
                "storyboardOverview": plan.storyboard_overview,
                "assets": assets,
            });
            write_assets(&out, &storyboard, &assets)?;
            print_json(&storyboard);
        }

        Commands::Lesson {
            topic,
            assets,
            out,
            narration_key,
        } => {
            let topic_text = read_text(&topic)?;
            let asset_ids: Vec<String> = (0..assets).map(asset_id).collect();
            let bundle = orchestrator
                .compose_lesson(&topic_text, &asset_ids, agents, narration_key.as_deref())
                .await?;
            write_bundle(&out, &bundle)?;
            summarize(&out, &json!(bundle.reconciliation));
        }

        Commands::Run {
            input,
            topic_index,
            out,
            narration_key,
        } => {
            let text = read_text(&input)?;
            let run = orchestrator
                .run(&text, topic_index, agents, narration_key.as_deref())
                .await?;
            let storyboard = json!({
                "topic": run.topic(),
                "storyboardOverview": run.plan().storyboard_overview,
                "assets": run.assets(),
            });
            write_assets(&out, &storyboard, run.assets())?;
            write_bundle(&out, run.bundle())?;
            summarize(&out, &json!(run.bundle().reconciliation));
        }
    }

    Ok(())
}

fn summarize(out: &Path, reconciliation: &serde_json::Value) {
    info!(out = %out.display(), "Lesson written");
    print_json(&json!({
        "out": out.display().to_string(),
        "reconciliation": reconciliation,
    }));
}
