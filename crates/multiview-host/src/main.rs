//! multiview-host: drive a multi-webview manager over stdio.
//!
//! Reads JSON-lines requests on stdin and writes responses and events as
//! JSON lines on stdout. Logs go to stderr. Surfaces are headless, which
//! makes this useful for scripting and for exercising clients without a
//! window system.

mod session;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use multiview_common::{EventBus, MultiviewError};
use multiview_config::MultiviewConfig;
use multiview_webview::backends::HeadlessFactory;
use multiview_webview::{CreateOptions, WebviewEvent, WebviewService};

#[derive(Parser)]
#[command(name = "multiview-host", about = "Multi-webview manager over JSON lines")]
struct Args {
    /// Config file. Defaults to the platform config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `multiview=debug`. Overrides the config.
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> multiview_common::Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => multiview_config::load_config_from(path),
        None => multiview_config::load_config(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (MultiviewConfig::default(), Some(e)),
    };

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directive.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "config unusable, running with defaults");
    }

    if args.print_config {
        println!("{}", multiview_config::config_to_json(&config));
        return Ok(());
    }

    let bus: EventBus<WebviewEvent> = EventBus::new(config.service.event_capacity as usize);
    let (service, client) = WebviewService::new(HeadlessFactory::new(), Arc::new(bus.clone()));
    let service = service.with_background(config.defaults.background_color());
    let events = bus.subscribe();
    // The service holds the only remaining sender; its exit closes the stream.
    drop(bus);

    let service = tokio::spawn(service.run());
    tracing::info!(
        event_capacity = config.service.event_capacity,
        "multiview-host ready"
    );

    session::serve(
        client,
        CreateOptions::from_defaults(&config.defaults),
        events,
        tokio::io::stdin(),
        tokio::io::stdout(),
    )
    .await?;

    service
        .await
        .map_err(|e| MultiviewError::Other(format!("service task failed: {e}")))?;
    Ok(())
}
