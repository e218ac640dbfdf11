//! AWS Terraform Generator CLI
//!
//! Command-line interface for drawing resource graphs from Terraform ASTs and
//! turning resource graphs back into stack configuration.

use anyhow::{bail, Context, Result};
use aws_terraform_generator_common::{Config, InfraConfig, ResourceCollection, ResourceType};
use aws_terraform_generator_generator::{generate_diagram, write_config};
use aws_terraform_generator_transformer::{ConfigTransformer, TerraformTransformer};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aws-terraform-generator")]
#[command(version, about = "Translate between Terraform, resource graphs and stack configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the resource graph of a Terraform AST as a Graphviz DOT file
    #[command(after_help = "EXAMPLES:\n  \
        # Draw a single stack\n  \
        aws-terraform-generator draw --infra main.json --config diagram.yaml\n\n  \
        # Merge several parsed files and write to ./docs\n  \
        aws-terraform-generator draw \\\n    \
        --infra lambda.json,apigateway.json \\\n    \
        --config diagram.yaml \\\n    \
        --output ./docs")]
    Draw {
        /// Comma-separated list of parsed Terraform AST files (JSON)
        #[arg(short, long, value_delimiter = ',', required = true)]
        infra: Vec<PathBuf>,

        /// Configuration document with filters and draw settings
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// Print the resource graph of a Terraform AST as JSON
    #[command(after_help = "EXAMPLES:\n  \
        # Inspect the inferred graph\n  \
        aws-terraform-generator inspect --infra main.json\n\n  \
        # Apply the filters of a configuration document\n  \
        aws-terraform-generator inspect --infra main.json --config diagram.yaml")]
    Inspect {
        /// Comma-separated list of parsed Terraform AST files (JSON)
        #[arg(short, long, value_delimiter = ',', required = true)]
        infra: Vec<PathBuf>,

        /// Configuration document with filters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build a stack configuration document from a resource graph
    #[command(after_help = "EXAMPLES:\n  \
        # Stack name from the configuration document\n  \
        aws-terraform-generator config \\\n    \
        --graph graph.json \\\n    \
        --config diagram.yaml \\\n    \
        --output mystack.yaml\n\n  \
        # Explicit stack name\n  \
        aws-terraform-generator config --graph graph.json --stack-name mystack --output mystack.yaml")]
    Config {
        /// Resource graph file (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Configuration document providing the stack name
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stack name (overrides the configuration document)
        #[arg(long)]
        stack_name: Option<String>,

        /// Output YAML file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.verbose {
        eprintln!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Draw {
            infra,
            config,
            output,
        } => {
            draw_command(&infra, config.as_path(), output.as_path())?;
        }
        Commands::Inspect { infra, config } => {
            inspect_command(&infra, config.as_deref())?;
        }
        Commands::Config {
            graph,
            config,
            stack_name,
            output,
        } => {
            config_command(
                graph.as_path(),
                config.as_deref(),
                stack_name.as_deref(),
                output.as_path(),
            )?;
        }
    }

    Ok(())
}

/// Log to stderr so that JSON written to stdout stays parseable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn draw_command(infra_paths: &[PathBuf], config_path: &Path, output: &Path) -> Result<()> {
    println!(
        "{} Loading configuration: {}",
        "→".cyan(),
        config_path.display()
    );
    let config = Config::load(config_path).context("Failed to load configuration document")?;

    let graph = build_graph(infra_paths, &config)?;

    println!("{} Rendering diagram...", "→".cyan());
    let path = generate_diagram(&config, &graph, output).context("Failed to generate diagram")?;

    println!("\n{}", "✓ Diagram generated!".green().bold());
    print_summary(&graph);
    println!("\n{}", "Generated files:".bold());
    println!("  📄 {}", path.display());
    println!("\n{}", "Next steps:".bold());
    println!("  dot -Tsvg {} -o diagram.svg", path.display());

    Ok(())
}

fn inspect_command(infra_paths: &[PathBuf], config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load(path).context("Failed to load configuration document")?,
        None => Config::default(),
    };

    let infra = load_infra(infra_paths)?;
    let graph = TerraformTransformer::new(&config, &infra)
        .transform()
        .context("Failed to transform Terraform AST")?;

    let json = serde_json::to_string_pretty(&graph).context("Failed to serialize graph")?;
    println!("{}", json);

    Ok(())
}

fn config_command(
    graph_path: &Path,
    config_path: Option<&Path>,
    stack_name: Option<&str>,
    output: &Path,
) -> Result<()> {
    println!("{} Loading graph: {}", "→".cyan(), graph_path.display());
    let content = std::fs::read_to_string(graph_path)
        .with_context(|| format!("Failed to read {}", graph_path.display()))?;
    let graph = ResourceCollection::from_json(&content).context("Failed to parse graph")?;

    let config = match config_path {
        Some(path) => Some(Config::load(path).context("Failed to load configuration document")?),
        None => None,
    };
    let stack_name = resolve_stack_name(stack_name, config.as_ref())?;

    println!("{} Building configuration for stack: {}", "→".cyan(), stack_name.yellow());
    let document = ConfigTransformer::new(&graph, &stack_name).transform();
    write_config(&document, output).context("Failed to write configuration document")?;

    println!("\n{}", "✓ Configuration generated!".green().bold());
    let api_gateways = document
        .stacks
        .iter()
        .map(|s| s.api_gateways.len())
        .sum::<usize>();
    println!("  API Gateways: {}", api_gateways);
    println!("  RESTful APIs: {}", document.restful_apis.len());
    println!("\n{}", "Generated files:".bold());
    println!("  📄 {}", output.display());

    Ok(())
}

/// Parse and merge AST files in the order given
fn load_infra(paths: &[PathBuf]) -> Result<InfraConfig> {
    let mut infra = InfraConfig::default();
    for path in paths {
        let parsed = InfraConfig::load(path)
            .with_context(|| format!("Failed to load Terraform AST {}", path.display()))?;
        infra.merge(parsed);
    }
    Ok(infra)
}

fn build_graph(infra_paths: &[PathBuf], config: &Config) -> Result<ResourceCollection> {
    println!(
        "{} Loading {} Terraform AST file(s)...",
        "→".cyan(),
        infra_paths.len()
    );
    let infra = load_infra(infra_paths)?;

    println!("{} Inferring resources...", "→".cyan());
    TerraformTransformer::new(config, &infra)
        .transform()
        .context("Failed to transform Terraform AST")
}

fn resolve_stack_name(explicit: Option<&str>, config: Option<&Config>) -> Result<String> {
    let name = explicit
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| config.map(Config::stack_name).filter(|name| !name.is_empty()));

    match name {
        Some(name) => Ok(name.to_string()),
        None => bail!("A stack name is required: pass --stack-name or set diagram.stack_name"),
    }
}

fn print_summary(graph: &ResourceCollection) {
    println!("\n{}", "Resources:".bold());
    for resource_type in ResourceType::ALL {
        let count = graph.of_type(resource_type).count();
        if count > 0 {
            println!("  • {}: {}", resource_type.to_string().cyan(), count);
        }
    }
    println!("  Relationships: {}", graph.relationships.len());
}
