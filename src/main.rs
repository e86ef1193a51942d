use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use record_intake::adapters::postgres::MIGRATOR;
use record_intake::adapters::{
    FileTranscriptSink, InMemoryRecordSink, InMemoryTranscriptSink, PostgresCatalogProvider,
    PostgresRecordSink,
};
use record_intake::app::{build_router, sample_catalog, spawn_idle_sweep, IntakeServices};
use record_intake::application::flush_transcript;
use record_intake::config::AppConfig;
use record_intake::domain::foundation::IntakeSessionId;
use record_intake::domain::intake::RecordKind;
use record_intake::ports::{CatalogProvider, RecordSink, TranscriptSink};

#[derive(Debug, Parser)]
#[command(name = "record-intake", version, about = "Conversational record intake")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Register one record interactively on the terminal
    Chat {
        /// asset, incident or risk
        kind: RecordKind,
    },
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let services = build_services(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, services).await,
        Command::Chat { kind } => chat(services, kind).await,
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    // stdout belongs to the conversation in chat mode
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_services(config: &AppConfig) -> Result<IntakeServices, BoxError> {
    let (catalog, sink): (Arc<dyn CatalogProvider>, Arc<dyn RecordSink>) = match &config.database
    {
        Some(database) => {
            let pool = database.connect().await?;
            if database.run_migrations {
                MIGRATOR.run(&pool).await?;
                info!("Database migrations applied");
            }
            (
                Arc::new(PostgresCatalogProvider::new(pool.clone())),
                Arc::new(PostgresRecordSink::new(pool)),
            )
        }
        None => {
            warn!("No database configured; records are kept in memory and lost on exit");
            (Arc::new(sample_catalog()), Arc::new(InMemoryRecordSink::new()))
        }
    };

    let transcripts: Arc<dyn TranscriptSink> = match &config.intake.transcript_dir {
        Some(dir) => Arc::new(FileTranscriptSink::new(dir)),
        None => Arc::new(InMemoryTranscriptSink::new()),
    };

    Ok(IntakeServices::new(
        catalog,
        sink,
        transcripts,
        config.intake.idle_timeout_secs,
    ))
}

async fn serve(config: &AppConfig, services: IntakeServices) -> Result<(), BoxError> {
    let sweep = config.intake.expiry_enabled().then(|| {
        spawn_idle_sweep(
            services.expire_handler.clone(),
            config.intake.sweep_interval(),
        )
    });

    let app = build_router(&services, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Record intake listening");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await;

    if let Some(sweep) = sweep {
        sweep.abort();
    }
    result?;
    Ok(())
}

async fn chat(services: IntakeServices, kind: RecordKind) -> Result<(), BoxError> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let (mut session, opening) = services.engine.start(IntakeSessionId::new(), kind).await;
    stdout.write_all(format!("{}\n> ", opening).as_bytes()).await?;
    stdout.flush().await?;

    loop {
        // end of input abandons the conversation
        let line = lines.next_line().await?.unwrap_or_else(|| "quit".to_string());
        let response = services.engine.submit(&mut session, &line).await;
        stdout
            .write_all(format!("{}\n", response.rendered_response).as_bytes())
            .await?;

        if response.is_terminal() {
            break;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }
    stdout.flush().await?;

    flush_transcript(services.transcript_sink.as_ref(), &mut session).await;
    Ok(())
}
