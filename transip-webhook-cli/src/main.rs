//! Command-line entry point for the TransIP DNS-01 solver
//!
//! Runs a single `present` or `cleanup` for a challenge request stored as JSON, using the
//! current kubeconfig (or in-cluster service account) to read credential secrets.
//!
//! ```bash
//! transip-webhook present --challenge challenge.json
//! transip-webhook cleanup --challenge - < challenge.json
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tokio::io::AsyncReadExt as _;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transip_webhook_core::{ChallengeAction, ChallengeRequest, Solver, TransipSolver, SOLVER_NAME};

#[derive(Parser, Debug)]
#[command(author, version, about = "TransIP ACME DNS-01 solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output - shows request level logs
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Creates the TXT record for a challenge.
    Present(ChallengeArgs),
    /// Removes the TXT record of a challenge.
    Cleanup(ChallengeArgs),
    /// Prints the solver name used in issuer configurations.
    Name,
}

#[derive(Args, Debug)]
struct ChallengeArgs {
    /// Challenge request JSON file, `-` for stdin
    #[arg(short, long)]
    challenge: PathBuf,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    kubeconfig_context: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout stays free for scripting.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "transip_webhook_core={default_level},transip_webhook_provider={default_level},transip_webhook={default_level},kube=warn,hyper=warn,reqwest=warn"
        ))
    });
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(filter)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Name => {
            println!("{SOLVER_NAME}");
            Ok(())
        }
        Commands::Present(args) => {
            let (solver, challenge) = prepare(&args, ChallengeAction::Present).await?;
            solver.present(&challenge).await?;
            tracing::info!("Presented {}", challenge.resolved_fqdn);
            Ok(())
        }
        Commands::Cleanup(args) => {
            let (solver, challenge) = prepare(&args, ChallengeAction::CleanUp).await?;
            solver.cleanup(&challenge).await?;
            tracing::info!("Cleaned up {}", challenge.resolved_fqdn);
            Ok(())
        }
    }
}

async fn prepare(
    args: &ChallengeArgs,
    action: ChallengeAction,
) -> anyhow::Result<(TransipSolver, ChallengeRequest)> {
    let challenge = read_challenge(&args.challenge).await?;
    check_action(&challenge, action)?;

    let cluster_config = match &args.kubeconfig_context {
        Some(context) => kube::Config::from_kubeconfig(&kube::config::KubeConfigOptions {
            context: Some(context.clone()),
            ..Default::default()
        })
        .await
        .with_context(|| format!("loading kubeconfig context '{context}'"))?,
        None => kube::Config::infer()
            .await
            .context("inferring Kubernetes configuration")?,
    };

    let solver = TransipSolver::builder()
        .build()
        .context("creating solver")?;
    // The process exits after one operation; nothing listens for shutdown.
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    solver
        .initialize(cluster_config, shutdown_rx)
        .await
        .context("initializing solver")?;

    Ok((solver, challenge))
}

/// A request that names its action must match the subcommand.
fn check_action(challenge: &ChallengeRequest, expected: ChallengeAction) -> anyhow::Result<()> {
    match challenge.action {
        Some(action) if action != expected => {
            anyhow::bail!("challenge request is for {action:?}, not {expected:?}")
        }
        _ => Ok(()),
    }
}

async fn read_challenge(path: &Path) -> anyhow::Result<ChallengeRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("reading challenge from stdin")?;
        raw
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading challenge file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("parsing challenge request")
}
