use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use samgis_prompt::{cli, config, error, replay, transport};
use samgis_prompt_common::{
    parse_query, resolve, GeometryPayload, MapViewport, PromptCollection, PromptSession,
    RequestOutcome, ResolvedBasemap,
};
use cli::{Cli, Commands};
use config::Config;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use transport::ReqwestTransport;

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Replay { events, output } => {
            let events = replay::load_events(&events)
                .with_context(|| format!("reading events from {}", events.display()))?;
            let prompts = replay::replay_events(&events)?;
            print!("{}", replay::render_tables(&prompts.rows()));

            if let Some(output) = output {
                std::fs::write(&output, serde_json::to_string_pretty(&prompts)?)?;
                println!("saved {} prompts to {}", prompts.len(), output.display());
            }
        }

        Commands::Send { prompts, events, bbox, zoom, source, query, endpoint, output } => {
            let collection = match (prompts, events) {
                (Some(path), _) => replay::load_prompts(&path)?,
                (None, Some(path)) => replay::replay_events(&replay::load_events(&path)?)?,
                (None, None) => PromptCollection::new(),
            };
            if collection.is_empty() {
                return Err(error::SamGisError::EmptyPrompt.into());
            }

            let from_query = query.as_deref().map(parse_query).and_then(|q| q.source);
            let source = source.or(from_query).unwrap_or_else(|| config.default_source.clone());
            if config.providers.url_for(&source).is_none() {
                tracing::warn!(source = %source, "source_type not in provider table");
            }

            let endpoint = endpoint.unwrap_or_else(|| config.get_endpoint());
            let transport = ReqwestTransport::new(config.timeout_seconds)?;
            let mut session = PromptSession::new(transport, endpoint);
            session.load_prompts(collection);
            session.viewport_changed(MapViewport { bbox, zoom });

            let outcome = submit_with_spinner(&session, &source).await?;

            let state = session.store().snapshot();
            match outcome {
                RequestOutcome::Completed(GeometryPayload::GeoJson(geojson)) => {
                    println!(
                        "duration {:.2}s, {} polygons, {} predicted masks",
                        state.duration, state.polygon_count, state.predicted_mask_count
                    );
                    write_geojson(&serde_json::to_string_pretty(&geojson)?, output)?;
                }
                RequestOutcome::Completed(GeometryPayload::Unparsed(text)) => {
                    anyhow::bail!("response geojson could not be parsed: {}", text);
                }
                RequestOutcome::Failed => {
                    anyhow::bail!("{}", state.response_message);
                }
            }
        }

        Commands::Basemap { url } => {
            let resolved = resolve(&url, &config.providers);
            println!("{}", resolved);
            if resolved == ResolvedBasemap::Unknown {
                tracing::debug!(url = %url, "no provider matches");
            }
        }

        Commands::Query { query } => {
            let params = parse_query(&query);
            println!("{}", serde_json::to_string_pretty(&params)?);
        }

        Commands::Config { set_endpoint, set_timeout, show } => {
            let mut changed = false;
            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                changed = true;
            }
            if let Some(timeout) = set_timeout {
                config.timeout_seconds = timeout;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("config saved to {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("endpoint: {}", config.get_endpoint());
                println!("timeout: {}s", config.timeout_seconds);
                println!("default source: {}", config.default_source);
                for provider in config.providers.iter() {
                    println!("provider: {} {}", provider.name, provider.url);
                }
            }
        }
    }

    Ok(())
}

/// Run the submit while a spinner mirrors `response_message`
async fn submit_with_spinner(
    session: &PromptSession<ReqwestTransport>,
    source: &str,
) -> anyhow::Result<RequestOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(session.submit_label());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut rx = session.store().subscribe();
    let watcher = {
        let spinner = spinner.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let message = rx.borrow_and_update().response_message.clone();
                spinner.set_message(message);
            }
        })
    };

    let outcome = session.submit(source).await;
    watcher.abort();
    spinner.finish_and_clear();
    Ok(outcome?)
}

fn write_geojson(geojson: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, geojson)?;
            println!("geojson saved to {}", path.display());
        }
        None => println!("{}", geojson),
    }
    Ok(())
}
