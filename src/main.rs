use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use futures::future::join_all;

use timon_dash::app::App;
use timon_dash::cli::{Cli, Commands, ConfigCommands, GlobalOpts};
use timon_dash::core::{ServiceRegistry, ServiceStatus};
use timon_dash::screens::status_label;
use timon_dash::utils::logging::{init_file_logging, init_logging};
use timon_dash::utils::{format_clock, AppConfig, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No command - run interactive TUI
            init_file_logging(&AppConfig::config_dir()?.join("timon-dash.log"))?;
            let settings = AppConfig::load()?.resolve(&cli.global.overrides())?;
            let mut app = App::new(&settings)?;
            app.run().await?;
        }
        Some(Commands::Status { json }) => {
            init_logging();
            let settings = AppConfig::load()?.resolve(&cli.global.overrides())?;
            handle_status(&settings, json).await?;
        }
        Some(Commands::Config { command }) => {
            init_logging();
            handle_config(command, &cli.global)?;
        }
        #[cfg(feature = "server")]
        Some(Commands::Serve { port, host, cors }) => {
            init_logging();
            let settings = AppConfig::load()?.resolve(&cli.global.overrides())?;
            timon_dash::server::run(settings, host, port, cors).await?;
        }
    }

    Ok(())
}

/// Run a single polling cycle and print the registry
async fn check_once(settings: &Settings) -> Result<ServiceRegistry> {
    let checker = settings.checker()?;
    let mut registry = settings.registry();

    let probes = registry.iter().map(|record| {
        let checker = checker.clone();
        let key = record.key.clone();
        let port = record.port;
        async move { (key, checker.check(port).await) }
    });

    for (key, outcome) in join_all(probes).await {
        registry.apply(&key, &outcome);
    }

    Ok(registry)
}

async fn handle_status(settings: &Settings, json: bool) -> Result<()> {
    let registry = check_once(settings).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(registry.records())?);
        return Ok(());
    }

    println!("Timón Pet Store - Service Status ({})\n", settings.target_host);
    println!("{:<22} {:<8} {:<16} {:<10} {:<10}", "Service", "Port", "Status", "Latency", "Checked");
    println!("{}", "-".repeat(70));

    for record in registry.iter() {
        let label = format!("{:<16}", status_label(record.status, settings.lang));
        let label = match record.status {
            ServiceStatus::Online => label.green(),
            ServiceStatus::Offline => label.red(),
            ServiceStatus::Loading => label.yellow(),
        };
        let latency = record
            .response_time_ms
            .map(|ms| format!("{} ms", ms))
            .unwrap_or_else(|| "-".to_string());
        let checked = record
            .last_checked
            .map(format_clock)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<22} {:<8} {} {:<10} {:<10}",
            record.name, record.port, label, latency, checked
        );
    }

    let online = registry.count(ServiceStatus::Online);
    println!();
    if online == registry.len() {
        println!("{}", format!("✓ All {} services online", online).green());
    } else {
        println!(
            "{}",
            format!("✗ {}/{} services online", online, registry.len()).red()
        );
    }

    Ok(())
}

fn handle_config(command: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let path = AppConfig::config_path()?;

    match command {
        ConfigCommands::View => {
            let config = AppConfig::load_from(&path)?;
            let settings = config.resolve(&global.overrides())?;

            println!("Configuration ({}):\n", path.display());
            println!("target_host:        {}", settings.target_host);
            println!("poll_interval_secs: {}", settings.poll_interval.as_secs());
            println!("probe_timeout_secs: {}", settings.probe_timeout.as_secs());
            println!("lang:               {:?}", settings.lang);
            println!("\nServices:");
            for record in settings.registry().iter() {
                println!("  {:<12} {:<22} port {}", record.key, record.name, record.port);
            }
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            AppConfig::with_defaults().save_to(&path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
