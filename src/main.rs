// Servmon - Systemd Service Health Monitor
// Main entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use servmon::ci::CiChecker;
use servmon::config::Config;
use servmon::monitor::{AlertLedger, HealthMonitor, TelegramNotifier};
use servmon::systemd::{ServiceController, SystemdClient};
use servmon::version::build_info;

#[derive(Parser, Debug)]
#[command(name = "servmon")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,

    /// Show detailed build information
    #[arg(long)]
    build_info: bool,

    /// List project services and exit
    #[arg(long)]
    list: bool,

    /// Print parsed status for one unit and exit
    #[arg(long, value_name = "UNIT")]
    status: Option<String>,

    /// Restart one unit and exit
    #[arg(long, value_name = "UNIT")]
    restart: Option<String>,

    /// Run a single health-check sweep and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle version flag
    if cli.version {
        println!("{}", build_info().format_display());
        return Ok(());
    }

    // Handle build info flag
    if cli.build_info {
        println!("{}", build_info().format_display());
        println!("\n{}", build_info().format_build_info());
        return Ok(());
    }

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(cli.config.map(std::path::PathBuf::from))?;
    let client = SystemdClient::new(&config);

    if cli.list {
        for service in client.list_services().await? {
            println!("{}", service);
        }
        return Ok(());
    }

    if let Some(service) = cli.status.as_deref() {
        return show_status(&client, &config, service).await;
    }

    if let Some(service) = cli.restart.as_deref() {
        let controller = ServiceController::new(client, &config);
        controller.restart_service(service).await?;
        println!("Restarted {}", service);
        return Ok(());
    }

    run_monitor(client, &config, cli.once).await
}

/// Print the parsed status record for one unit, plus the raw blob.
async fn show_status(client: &SystemdClient, config: &Config, service: &str) -> Result<()> {
    let mut status = client.service_status(service).await?;

    // CI status only applies to primary units, and only when configured.
    if status.is_primary() {
        if let Some(owner) = &config.github_owner {
            let checker = CiChecker::new(owner.clone(), config.ci_timeout())?;
            match checker.latest_run_status(&status.project_group).await {
                Ok(ci) => status.ci_status = Some(ci),
                Err(e) => {
                    tracing::warn!("CI status unavailable for {}: {}", status.project_group, e)
                }
            }
        }
    }

    println!("{}: {}", status.name, status.status_text());
    println!("  project group: {}", status.project_group);
    if let Some(suffix) = &status.suffix {
        println!("  suffix: {}", suffix);
    }
    if let Some(uptime) = &status.uptime {
        println!("  uptime: {}", uptime);
    }
    if let Some(memory) = &status.memory {
        println!("  memory: {}", memory);
    }
    if let Some(cpu) = &status.cpu {
        println!("  cpu: {}", cpu);
    }
    if let Some(error) = &status.last_error {
        println!("  last error: {}", error);
    }
    if let Some(ci) = status.ci_status {
        println!("  ci: {}", ci.label());
    }
    println!("\n{}", status.full_status);
    Ok(())
}

/// Run the health-check daemon, or a single sweep with `--once`.
async fn run_monitor(client: SystemdClient, config: &Config, once: bool) -> Result<()> {
    client.check_available().await?;

    let (api_token, chat_id) = config.telegram()?;
    let notifier = TelegramNotifier::new(api_token, chat_id)?;
    let ledger = Arc::new(AlertLedger::new(config.alert_reset_hour));
    let monitor = HealthMonitor::new(client, notifier, ledger);

    if once {
        monitor.run_check().await;
        return Ok(());
    }

    let handle = monitor.spawn();
    tracing::info!("Servmon started, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;

    println!("Servmon exited. Goodbye!");
    Ok(())
}
