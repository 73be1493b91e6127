use anyhow::Context;
use clap::{Parser, Subcommand};
use plugscan_core::report::resolve_format_token;
use plugscan_core::{render, LocationRegistry, ReportMode, ScanConfig, ScanSnapshot};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plugscan")]
#[command(author, version, about = "List installed macOS audio plugins (AU, VST, VST3, AAX)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print a JSON snapshot instead of the text report
    #[arg(long, global = true)]
    json: bool,

    /// Home directory used to expand `~` locations
    #[arg(long, global = true, env = "PLUGSCAN_HOME")]
    home: Option<PathBuf>,

    /// Prefix for system-wide locations (e.g. a mounted volume)
    #[arg(long, global = true, env = "PLUGSCAN_ROOT")]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidated plugin list with a per-format breakdown (default)
    Summary,
    /// Consolidated list including every install path
    Detailed,
    /// Plugins of a single format
    ByType {
        /// Format to list: au, vst, vst3 or aax
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "plugscan_core=debug"
    } else {
        "plugscan_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ScanConfig {
        home: cli.home,
        system_root: cli.root,
    };
    let collection = LocationRegistry::standard().scan_installed(&config.resolver());

    let mode = match cli.command {
        None | Some(Commands::Summary) => ReportMode::Summary,
        Some(Commands::Detailed) => ReportMode::Detailed,
        Some(Commands::ByType { format }) => ReportMode::ByType(format),
    };

    if cli.json {
        let json = match &mode {
            ReportMode::ByType(token) => {
                let records = resolve_format_token(token)
                    .map(|format| collection.bucket(format))
                    .unwrap_or(&[]);
                serde_json::to_string_pretty(records)
            }
            _ => serde_json::to_string_pretty(&ScanSnapshot::new(
                &collection,
                mode == ReportMode::Detailed,
            )),
        }
        .context("Failed to serialize scan")?;
        println!("{json}");
        return Ok(());
    }

    for line in render(&collection, &mode) {
        println!("{line}");
    }

    Ok(())
}
