use annotkit::replay::{self, ReplayScript};
use annotkit::{init_logging, Config};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Annotation editing tools
#[derive(Debug, Parser)]
#[command(name = "annotkit", version, about)]
struct Cli {
    /// Config file (.toml or .json); defaults to the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run an editing script against its document and print the result
    Replay {
        /// Script with a `document` and its `steps`
        script: PathBuf,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration, or write the defaults
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

/// The config and the file it came from; `None` when the defaults are used.
fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    match path {
        Some(path) => Ok((Config::load_from_file(path)?, Some(path.to_path_buf()))),
        None => Ok(Config::load_or_default()?),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, source) =
        load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging)?;
    match &source {
        Some(path) => tracing::info!("Using config {}", path.display()),
        None => tracing::info!("Using default configuration"),
    }

    match cli.command {
        Command::Replay { script, output } => {
            let loaded = ReplayScript::load(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let steps = loaded.steps.len();
            let report = replay::run(loaded, &config);
            let (pages, annotations) = replay::summarize(&report.document);
            tracing::info!(
                "Replayed {} steps: {} pages, {} annotations, {} undoable",
                steps,
                pages,
                annotations,
                report.history.len()
            );

            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        Command::Config { init } => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::default_path()?,
            };
            if init {
                Config::default().save_to_file(&path)?;
                println!("{}", path.display());
            } else {
                println!("# {}", path.display());
                println!("{}", toml_or_json(&config, &path)?);
            }
        }
    }

    Ok(())
}

fn toml_or_json(config: &Config, path: &Path) -> anyhow::Result<String> {
    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(serde_json::to_string_pretty(config)?)
    } else {
        Ok(toml::to_string_pretty(config)?)
    }
}
