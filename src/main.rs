use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herald::config::{Config, Credentials};
use herald::content::{BroadcastKind, Composer};
use herald::dispatch::EventDispatcher;
use herald::llm::FlavorClient;
use herald::media::MediaPicker;
use herald::orchestrator::jobs::{AmplifyJob, BroadcastJob, DiagnosticJob, RespondJob};
use herald::orchestrator::Orchestrator;
use herald::platform::HttpPlatformClient;
use herald::scheduler::JobScheduler;
use herald::store::MentionLedger;

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "Autonomous social agent for 9D Tic-Tac-Toe",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent: scheduler plus webhook server
    Run {
        /// Path to a TOML config file; environment overrides apply
        /// when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the startup activation post
        #[arg(long, default_value = "false")]
        no_activation: bool,
    },

    /// Draft broadcasts locally without posting
    Preview {
        /// Broadcast archetype (game_update, strategy_tip, game_fact,
        /// achievement_showcase, motivational, event_alert); random
        /// when omitted
        #[arg(short, long)]
        kind: Option<String>,

        /// Number of drafts to print
        #[arg(short, long, default_value = "3")]
        count: usize,
    },

    /// Post a game event payload to a running agent's webhook
    SendEvent {
        /// JSON event payload
        payload: String,

        /// Webhook URL
        #[arg(long, default_value = "http://127.0.0.1:8080/event")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Run {
            config,
            no_activation,
        } => {
            tracing::info!(config = ?config, "Starting run command");
            run(config, no_activation).await?;
        }

        Commands::Preview { kind, count } => {
            preview(kind, count)?;
        }

        Commands::SendEvent { payload, url } => {
            send_event(payload, url).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("herald=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("herald=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn run(config_path: Option<PathBuf>, no_activation: bool) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::from_file(&path)?,
        None => Config::from_env()?,
    };
    config.validate()?;

    let credentials = Credentials::from_env()?;

    let platform = Arc::new(
        HttpPlatformClient::new(credentials.bearer_token.clone())
            .context("Failed to build platform client")?,
    );

    let flavor = match &credentials.flavor_token {
        Some(token) => Some(FlavorClient::new(&config.flavor, token.clone())?),
        None => {
            tracing::info!("No flavor token configured, generated replies disabled");
            None
        }
    };

    let ledger = Arc::new(MentionLedger::open(config.storage.ledger_path.clone()));
    let orchestrator = Arc::new(Orchestrator::new(
        platform,
        Composer::new(config.persona.clone()),
        ledger,
        MediaPicker::new(config.storage.media_dir.clone()),
        flavor,
    ));

    tracing::info!(bot = %config.persona.bot_name, "Agent starting");

    if no_activation {
        tracing::info!("Activation post skipped");
    } else if let Err(e) = orchestrator.announce_activation().await {
        tracing::warn!(error = %e, "Activation post failed");
    }

    let mut scheduler = JobScheduler::new();
    scheduler.register(
        Arc::new(BroadcastJob(Arc::clone(&orchestrator))),
        config.timing.broadcast_policy(),
    );
    scheduler.register(
        Arc::new(RespondJob(Arc::clone(&orchestrator))),
        config.timing.respond_policy(),
    );
    scheduler.register(
        Arc::new(AmplifyJob(Arc::clone(&orchestrator))),
        config.timing.amplify_policy(),
    );
    scheduler.register(
        Arc::new(DiagnosticJob(Arc::clone(&orchestrator))),
        config.timing.diagnostic_policy(),
    );
    scheduler.start();

    let dispatcher = Arc::new(EventDispatcher::new(Arc::clone(&orchestrator)));
    herald::server::serve(&config.server, dispatcher, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received");
    })
    .await?;

    scheduler.shutdown().await;
    tracing::info!("Agent stopped");
    Ok(())
}

fn preview(kind: Option<String>, count: usize) -> Result<()> {
    let composer = Composer::new(Config::from_env()?.persona);
    let mut rng = rand::thread_rng();

    let kinds: Vec<BroadcastKind> = match kind.as_deref() {
        Some(label) => {
            let kind = BroadcastKind::ALL
                .into_iter()
                .find(|k| k.label() == label)
                .with_context(|| format!("Unknown broadcast kind: {label}"))?;
            vec![kind]
        }
        None => BroadcastKind::ALL.to_vec(),
    };

    let hour = chrono::Timelike::hour(&chrono::Local::now());
    for kind in kinds {
        println!("=== {} ===", kind.label());
        for _ in 0..count {
            let draft = composer.draft_broadcast(kind, hour, &mut rng);
            println!("{draft}");
            println!("--- ({} chars)", draft.chars().count());
        }
    }
    Ok(())
}

async fn send_event(payload: String, url: String) -> Result<()> {
    let body: serde_json::Value =
        serde_json::from_str(&payload).context("Payload is not valid JSON")?;

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("Failed to reach webhook at {url}"))?;

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    println!("{status}: {text}");
    Ok(())
}
