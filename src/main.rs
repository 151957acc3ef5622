//! `webhook-settlement` binary.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tokio::sync::watch;

use webhook_settlement::adapters::{
    HttpWebhookSource, InMemoryProcessedEventStore, StarkBankAdapter,
};
use webhook_settlement::application::{
    Authenticator, EventVerifier, IssuanceLoop, PollLoop, SettlementReactor, ShutdownSignal,
};
use webhook_settlement::config::AppConfig;
use webhook_settlement::domain::identity::Session;
use webhook_settlement::ports::BankingProvider;

#[derive(Debug, Parser)]
#[command(name = "webhook-settlement", version, about)]
struct Cli {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run invoice issuance and webhook settlement side by side
    Run,
    /// Run only the invoice issuance loop
    Issue,
    /// Run only the webhook settlement loop
    Settle,
    /// Generate a key pair into DIR
    CreateKeys {
        /// Destination directory
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.logging.init()?;

    if let Command::CreateKeys { dir } = &cli.command {
        Authenticator::create_keys(dir).await?;
        return Ok(());
    }

    config.validate()?;

    let provider: Arc<dyn BankingProvider> =
        Arc::new(StarkBankAdapter::new(config.http.provider_config())?);
    let session = authenticate(&config, provider.as_ref()).await?;

    let (tx, signal) = ShutdownSignal::channel();
    spawn_ctrl_c(tx);

    let mut tasks = Vec::new();

    if matches!(cli.command, Command::Run | Command::Issue) {
        let issuance = IssuanceLoop::new(
            provider.clone(),
            config.issuance.policy()?,
            config.issuance.schedule()?,
        );
        let session = session.clone();
        let signal = signal.clone();
        tasks.push(tokio::spawn(async move {
            let report = issuance.run(&session, signal).await;
            tracing::info!(?report, "Issuance finished");
        }));
    }

    if matches!(cli.command, Command::Run | Command::Settle) {
        let webhook = config.polling.webhook_config(&config.engine.webhook_url)?;
        let source = HttpWebhookSource::new(
            webhook.endpoint_url().clone(),
            config.http.request_timeout(),
        )?;

        let mut reactor = SettlementReactor::new(provider.clone(), config.settlement.clone());
        if config.polling.deduplicate_events {
            reactor = reactor.with_deduplication(Arc::new(InMemoryProcessedEventStore::new()));
        }

        let poll = PollLoop::new(
            Arc::new(source),
            Arc::new(EventVerifier::new(provider.clone())),
            Arc::new(reactor),
            webhook,
        );
        let session = session.clone();
        let signal = signal.clone();
        tasks.push(tokio::spawn(async move {
            let report = poll.run(&session, signal).await;
            tracing::info!(?report, "Settlement finished");
        }));
    }

    for task in tasks {
        task.await?;
    }

    Ok(())
}

async fn authenticate(
    config: &AppConfig,
    provider: &dyn BankingProvider,
) -> Result<Session, Box<dyn Error>> {
    let key_path = &config.engine.private_key_path;
    let pem = tokio::fs::read_to_string(key_path).await.map_err(|e| {
        tracing::error!(path = %key_path.display(), error = %e, "Cannot read private key");
        e
    })?;

    let authenticator = Authenticator::new(
        &config.engine.environment,
        &config.engine.id,
        &SecretString::new(pem),
        &config.engine.auth_type,
    )?;

    Ok(authenticator.authenticate(provider).await?)
}

fn spawn_ctrl_c(tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            let _ = tx.send(true);
        }
    });
}
