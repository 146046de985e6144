//! Customer Pulse assistant binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Install tracing (stderr, so answers on stdout stay clean)
//! 3. Load and check the CRM snapshot
//! 4. Answer a one-shot question, or run an interactive session on stdin

mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use pulse_chat::{Assistant, ChatError};
use pulse_core::{DataSnapshot, PulseConfig, PulseError};
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::CliArgs;

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];

/// Load the snapshot at `path`, or an empty one when no path is configured.
///
/// Validation problems are logged and the snapshot is still used.
fn load_snapshot(path: Option<&Path>, newest_first: bool) -> Result<DataSnapshot, ChatError> {
    let snapshot = match path {
        Some(path) => DataSnapshot::load(path)?,
        None => {
            tracing::warn!("No snapshot configured; answering from an empty data set");
            DataSnapshot::default()
        }
    };

    if let Err(e) = snapshot.validate() {
        tracing::warn!(error = %e, "Snapshot failed validation");
    }

    Ok(if newest_first {
        snapshot.newest_first()
    } else {
        snapshot
    })
}

/// Print the assistant's answer after the simulated typing delay.
async fn reply(text: &str, delay_ms: u64) {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    println!("{}\n", text);
}

/// Interactive session: one question per line until exit/quit or EOF.
async fn run_interactive(
    assistant: &Assistant,
    snapshot: &DataSnapshot,
    delay_ms: u64,
) -> std::io::Result<()> {
    let mut session = assistant.open_session();
    if let Some(greeting) = session.last_turn() {
        println!("{}\n", greeting.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if EXIT_COMMANDS.contains(&message.to_lowercase().as_str()) {
            break;
        }

        match assistant.handle_message(&mut session, message, snapshot) {
            Ok(result) => reply(&result.response, delay_ms).await,
            Err(ChatError::EmptyMessage) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Message rejected");
                println!("{}\n", e);
            }
        }
    }

    tracing::info!(
        session_id = %session.id,
        turns = session.len(),
        "Session ended"
    );
    Ok(())
}

async fn run(args: &CliArgs, config: &PulseConfig) -> Result<(), Box<dyn std::error::Error>> {
    let data_path = args.resolve_data_path(config.data.snapshot_path.as_deref());
    let newest_first = args.resolve_newest_first(config.data.newest_first);
    let snapshot = load_snapshot(data_path.as_deref(), newest_first)?;

    let assistant = Assistant::new(config.assistant.clone());

    match args.one_shot_query() {
        Some(query) => {
            let result = assistant.analyze(&query, &snapshot);
            tracing::debug!(intent = result.kind.as_str(), "One-shot query answered");
            println!("{}", result.response);
        }
        None => {
            let delay_ms = args.resolve_typing_delay(config.session.typing_delay_ms);
            run_interactive(&assistant, &snapshot, delay_ms).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let (config, config_error) = PulseConfig::load_with_fallback(&config_file);

    // Tracing.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Customer Pulse assistant v{}", env!("CARGO_PKG_VERSION"));
    match config_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(PulseError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %config_file.display(), "No configuration file; using defaults")
        }
        Some(e) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Failed to load configuration; using defaults")
        }
    }

    match run(&args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Customer Pulse assistant failed");
            ExitCode::FAILURE
        }
    }
}
