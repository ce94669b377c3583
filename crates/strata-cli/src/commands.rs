use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use strata_loader::events::EventStream;
use strata_loader::{
    save_token, InMemoryScene, LoadSession, LoadSummary, LoaderConfig, LoaderEvent,
    SceneObject,
};
use strata_store::dump;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Load(args) => cmd_load(args, config, &cli.format).await,
        Command::Config(_) => cmd_config(&config, &cli.format),
        Command::Token(args) => cmd_token(args, &config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LoaderConfig> {
    match path {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(LoaderConfig::default()),
    }
}

async fn cmd_load(args: LoadArgs, config: LoaderConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let store = dump::open(&args.dump)
        .with_context(|| format!("failed to read dump {}", args.dump.display()))?;
    let scene = Arc::new(InMemoryScene::new());
    let session = LoadSession::new(&args.url, args.token, config, Arc::new(store), scene.clone())?;

    let mut events = session.subscribe();
    let summary = session.load().await?;
    let warnings = drain_warnings(&mut events);
    let objects = scene.objects();

    match format {
        OutputFormat::Json => {
            let listed: Vec<_> = objects.iter().map(object_json).collect();
            let report = json!({
                "summary": summary,
                "warnings": warnings,
                "objects": listed,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print_summary(&summary);
            for warning in &warnings {
                println!("  {} {}", "warning:".yellow().bold(), warning);
            }
            if args.objects {
                for object in &objects {
                    print_object(object);
                }
            }
        }
    }
    Ok(())
}

/// Collect warning messages published during the load. Progress events
/// only matter while a load is running.
fn drain_warnings(events: &mut EventStream) -> Vec<String> {
    let mut warnings = Vec::new();
    loop {
        match events.try_recv() {
            Ok(LoaderEvent::Warning { message }) => warnings.push(message),
            Ok(LoaderEvent::Progress { .. }) => {}
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "event receiver lagged"),
            Err(_) => break,
        }
    }
    warnings
}

fn print_summary(summary: &LoadSummary) {
    println!("{} Loaded {}", "✓".green().bold(), summary.url.bold());
    println!("  Fragments: {}/{}", summary.fragments, summary.total + 1);
    println!("  Converted: {}", summary.converted.to_string().green());
    if summary.failed > 0 {
        println!("  Failed branches: {}", summary.failed.to_string().red());
    }
}

fn print_object(object: &SceneObject) {
    let result = &object.result;
    let id = result
        .object_id
        .as_ref()
        .map(|id| id.short_id().to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "  {} {}  {} triangles, {} vertices, radius {:.3}",
        result.type_tag.cyan(),
        id.dimmed(),
        result.geometry.triangle_count(),
        result.geometry.vertex_count(),
        result.geometry.bounding_sphere.radius,
    );
}

fn object_json(object: &SceneObject) -> serde_json::Value {
    let result = &object.result;
    json!({
        "id": result.object_id.as_ref().map(|id| id.as_str()),
        "type": result.type_tag,
        "triangles": result.geometry.triangle_count(),
        "vertices": result.geometry.vertex_count(),
        "bounding_sphere": result.geometry.bounding_sphere,
    })
}

fn cmd_config(config: &LoaderConfig, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

fn cmd_token(args: TokenArgs, config: &LoaderConfig) -> anyhow::Result<()> {
    let path = args
        .path
        .or_else(|| config.token_file.clone())
        .context("no token file configured; pass --path or set token_file")?;
    save_token(&path, &args.token)
        .with_context(|| format!("failed to write token to {}", path.display()))?;
    println!("{} Token saved to {}", "✓".green().bold(), path.display());
    Ok(())
}
