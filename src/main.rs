use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use ircroom::cli::{generate_example_config, Cli};
use ircroom::config::SessionConfig;
use ircroom::session::Session;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Handle config generation
    if cli.generate_config {
        let example_config = generate_example_config();
        println!("{}", example_config);
        return Ok(());
    }

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = SessionConfig::load(&cli.config).map_err(|e| {
        tracing::error!("Failed to load session from {:?}: {}", cli.config, e);
        e
    })?;
    info!("Session loaded with {} steps", config.steps.len());

    let session = Arc::new(Session::from_config(&config)?);

    // Steps are applied on their own task, the way a network reader would.
    let (tx, rx) = mpsc::channel(32);
    let transport = tokio::spawn(Arc::clone(&session).process(rx));
    for step in config.steps {
        tx.send(step).await?;
    }
    drop(tx);

    let applied = transport.await?;
    info!("Applied {} steps", applied);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&session.roster())?);
    } else {
        for (channel, names) in session.names() {
            println!("{} :{}", channel, names);
        }
    }

    Ok(())
}
