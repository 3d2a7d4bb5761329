//! tunnel-conf: inspect, normalize and convert tunnel client configurations.
//!
//! # Commands
//!
//! ```text
//! tunnel-conf show <path> [--json]       decoded model, summary or JSON
//! tunnel-conf aliases <path>             start aliases of every proxy
//! tunnel-conf check <path>               semantic validation
//! tunnel-conf normalize <path>           complete and rewrite in place
//! tunnel-conf convert <in> <out> --to F  rewrite in another format
//! tunnel-conf watch <path>               report every reload until Ctrl-C
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use tunnel_conf::config::watcher::ConfigWatcher;
use tunnel_conf::config::{load_config, save_config, validate_config, ConfigError, Format};
use tunnel_conf::observability::logging;

#[derive(Parser)]
#[command(name = "tunnel-conf")]
#[command(about = "Inspect, normalize and convert tunnel client configurations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decoded configuration
    Show {
        path: PathBuf,
        /// Print the full model as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the start aliases of every proxy
    Aliases { path: PathBuf },
    /// Run semantic validation
    Check { path: PathBuf },
    /// Complete the configuration and write it back in place
    Normalize { path: PathBuf },
    /// Rewrite a configuration in another format
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum)]
        to: Target,
    },
    /// Watch a configuration file and report every reload
    Watch { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Legacy,
    Modern,
}

impl From<Target> for Format {
    fn from(target: Target) -> Self {
        match target {
            Target::Legacy => Format::Legacy,
            Target::Modern => Format::Modern,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_DIRECTIVES);
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { path, json } => {
            let config = load_config(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("name: {}", config.name());
                println!("format: {}", config.format());
                println!("server: {}:{}", config.common.server_addr, config.common.server_port);
                println!("auto start: {}", config.auto_start());
                println!("proxies ({} enabled):", config.count_start());
                for proxy in &config.proxies {
                    let state = if proxy.base.disabled { "disabled" } else { "enabled" };
                    println!("  {} ({}) {}", proxy.name(), proxy.base.proxy_type, state);
                }
            }
        }
        Commands::Aliases { path } => {
            let config = load_config(&path)?;
            for alias in config.proxies.iter().flat_map(|p| p.aliases()) {
                println!("{}", alias);
            }
        }
        Commands::Check { path } => {
            let config = load_config(&path)?;
            validate_config(&config).map_err(ConfigError::Validation)?;
            println!("{}: ok", path.display());
        }
        Commands::Normalize { path } => {
            let mut config = load_config(&path)?;
            save_config(&mut config, &path)?;
            tracing::info!(path = %path.display(), "Configuration normalized");
        }
        Commands::Convert { input, output, to } => {
            let mut config = load_config(&input)?;
            config.convert(to.into());
            save_config(&mut config, &output)?;
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                format = %config.format(),
                "Configuration converted"
            );
        }
        Commands::Watch { path } => {
            let (watcher, mut updates) = ConfigWatcher::new(&path);
            let _handle = watcher.run()?;
            loop {
                tokio::select! {
                    Some(config) = updates.recv() => {
                        tracing::info!(
                            name = %config.name(),
                            proxies = config.proxies.len(),
                            enabled = config.count_start(),
                            "Configuration reloaded"
                        );
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}
