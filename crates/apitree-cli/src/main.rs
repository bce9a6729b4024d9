mod render;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use apitree_core::config::{self, ApitreeConfig, CONFIG_FILE_NAME, ParserConfig};
use apitree_core::ir::GroupRecord;
use apitree_core::parse::{self, Document};
use apitree_core::{TreeRenderer, build_tree};

use render::{JsonRenderer, YamlRenderer};

#[derive(Parser)]
#[command(
    name = "apitree",
    about = "Normalize OpenAPI 3.x documents into interface trees",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grouped interface tree of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: InspectFormat,

        /// Only print the group with this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Initialize a new apitree configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input, format, tag } => cmd_inspect(input, format, tag),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apitree", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<ApitreeConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    log::debug!("loading {} as {ext}", path.display());

    let doc = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(doc)
}

/// Resolve the input path and parser options from the CLI flag and config.
fn prepare(input: Option<PathBuf>) -> Result<(Document, ParserConfig)> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let doc = load_document(&input)?;

    let mut parser = cfg.parser;
    if parser.title.is_empty() {
        parser.title = doc.spec.info.title.clone();
    }
    Ok((doc, parser))
}

fn cmd_inspect(input: Option<PathBuf>, format: InspectFormat, tag: Option<String>) -> Result<()> {
    let (doc, parser) = prepare(input)?;
    let mut groups = build_tree(&doc, &parser);

    if let Some(tag) = tag {
        groups.retain(|g| g.title == tag);
        if groups.is_empty() {
            anyhow::bail!("no operations tagged {tag:?}");
        }
    }

    let out = match format {
        InspectFormat::Json => JsonRenderer.render(&groups)?,
        InspectFormat::Yaml => YamlRenderer.render(&groups)?,
    };
    print!("{out}");
    Ok(())
}

fn cmd_validate(input: Option<PathBuf>) -> Result<()> {
    let (doc, parser) = prepare(input)?;

    eprintln!(
        "Valid OpenAPI {} document: {}",
        doc.spec.openapi, doc.spec.info.title
    );
    eprintln!("  Version: {}", doc.spec.info.version);
    eprintln!("  Paths: {}", doc.spec.paths.len());

    let groups = build_tree(&doc, &parser);
    eprintln!("  Operations: {}", count_operations(&doc));
    eprintln!("  Groups: {}", groups.len());
    eprintln!("  Records: {}", count_records(&groups));

    eprintln!("Validation successful.");
    Ok(())
}

fn count_operations(doc: &Document) -> usize {
    doc.spec.paths.values().map(|p| p.operations().len()).sum()
}

/// Operations with several tags are counted once per group.
fn count_records(groups: &[GroupRecord]) -> usize {
    groups.iter().map(|g| g.children.len()).sum()
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
