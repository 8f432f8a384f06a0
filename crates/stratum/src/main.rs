//! Command-line front end for layered service config resolution.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use stratum_config::{DefaultSource, ResolveOptions, ServiceConfig, resolve, write_json};

/// Command-line options for the resolver.
#[derive(Parser)]
#[command(name = "stratum", version, about = "Resolve layered service configuration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a config and print it (or write it) as JSON
    Resolve {
        #[command(flatten)]
        source: SourceArgs,
        /// Optional .env file loaded before the environment overlay
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
        /// Write the resolved config to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Unify the documents and report errors without consulting the environment
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to the user JSON5 document
    #[arg(long, default_value = "config.json5")]
    config: PathBuf,
    /// Directory of default schema documents (bundled defaults when unset)
    #[arg(long)]
    defaults: Option<PathBuf>,
}

impl SourceArgs {
    fn default_source(&self) -> DefaultSource {
        match self.defaults.as_ref() {
            Some(dir) => DefaultSource::Directory(dir.clone()),
            None => DefaultSource::Bundled,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Resolve {
            source,
            env_file,
            out,
        } => {
            info!(
                "resolving config (config={}, defaults_set={})",
                source.config.display(),
                source.defaults.is_some()
            );
            let options = ResolveOptions::new(&source.config)
                .with_defaults(source.default_source())
                .with_env_file(&env_file);
            let config = resolve(&options).context("failed to resolve config")?;
            match out {
                Some(path) => {
                    write_json(&config, &path)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!("wrote resolved config to {}", path.display());
                }
                None => {
                    let json = serde_json::to_string_pretty(&config)
                        .context("failed to serialize config")?;
                    println!("{json}");
                }
            }
        }
        Command::Check { source } => {
            let config = ServiceConfig::from_documents(&source.default_source(), &source.config)
                .context("config check failed")?;
            debug!("checked config (name={})", config.name);
            println!("ok: {}", config.name);
        }
    }
    Ok(())
}
