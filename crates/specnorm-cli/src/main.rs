use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use specnorm_core::config::{self, CONFIG_FILE_NAME, SpecnormConfig};
use specnorm_core::fetch;
use specnorm_core::{NormalizeOptions, Pipeline, RunReport, normalize_bytes};

#[derive(Parser)]
#[command(
    name = "specnorm",
    about = "Normalize an OpenAPI document and partition it by API version",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, normalize and partition the document, then run code generation
    Generate {
        /// URL or path of the source document (overrides config)
        #[arg(short, long)]
        source: Option<String>,

        /// Root directory for version partitions (overrides config)
        #[arg(long)]
        versions_dir: Option<PathBuf>,

        /// Skip the external code generator
        #[arg(long)]
        no_codegen: bool,
    },

    /// Normalize a document without partitioning or code generation
    Normalize {
        /// URL or path of the source document
        #[arg(short, long)]
        input: String,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a new specnorm configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            source,
            versions_dir,
            no_codegen,
        } => cmd_generate(source, versions_dir, no_codegen),

        Commands::Normalize { input, output } => cmd_normalize(input, output),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "specnorm", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SpecnormConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let cfg = config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))?;
    if cfg.is_none() {
        log::debug!("no {CONFIG_FILE_NAME} found, using defaults");
    }
    Ok(cfg)
}

fn cmd_generate(
    source: Option<String>,
    versions_dir: Option<PathBuf>,
    no_codegen: bool,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(source) = source {
        cfg.source = source;
    }
    if let Some(dir) = versions_dir {
        cfg.versions_dir = dir.to_string_lossy().into_owned();
    }
    if no_codegen {
        cfg.codegen.enabled = false;
    }

    eprintln!("Normalizing {}", cfg.source);
    let report = Pipeline::new(cfg)
        .run()
        .context("normalization run failed")?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    eprintln!(
        "API version {} → {}",
        report.partition.version,
        report.partition.output_dir.display()
    );
    eprintln!("  wrote {}", report.spec_path.display());
    eprintln!("  Schemas: {}", report.schema_count);

    let completion = &report.completion;
    if !completion.is_empty() {
        eprintln!(
            "  Completed: {} responses, {} path parameters, {} schemas",
            completion.responses, completion.parameters, completion.schemas
        );
    }

    match &report.codegen_output {
        Some(output) if !output.trim().is_empty() => eprintln!("{}", output.trim_end()),
        Some(_) => eprintln!("  code generation finished"),
        None => eprintln!("  code generation skipped"),
    }
}

fn cmd_normalize(input: String, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let timeout = cfg
        .fetch
        .timeout_secs
        .map(std::time::Duration::from_secs);

    let raw = fetch::fetch_source(&input, timeout)
        .with_context(|| format!("failed to load {input}"))?;
    let options = NormalizeOptions::from_config(&cfg)?;
    let normalized = normalize_bytes(raw, &options)
        .with_context(|| format!("failed to normalize {input}"))?;
    let json = normalized.to_pretty_json()?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Normalized {} schemas into {}",
                normalized.mapping.len(),
                path.display()
            );
        }
        None => print!("{json}"),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
