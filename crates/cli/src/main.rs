use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use vis_usage_collector::{
    CollectorConfig, FileSampleData, FileSearchClient, NoSampleData, SampleDataProvider,
    VegaUsageCollector,
};

mod report;

#[derive(Parser)]
#[command(name = "vis-usage")]
#[command(about = "Vega visualization usage telemetry", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize Vega usage from a captured search response
    Summarize(SummarizeArgs),

    /// Print the JSON Schema of the usage summary
    Schema(SchemaArgs),

    /// Show the collector type, readiness and the search it issues
    Describe(DescribeArgs),
}

#[derive(Args)]
struct SummarizeArgs {
    /// Search response JSON (`{"hits":{"hits":[...]}}`) or a bare array of hits
    #[arg(long)]
    hits: PathBuf,

    /// Sample dataset manifest; matching visualizations are not counted
    #[arg(long)]
    samples: Option<PathBuf>,

    /// Collector config (JSON or TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render a markdown report instead of JSON
    #[arg(long)]
    markdown: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct SchemaArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct DescribeArgs {
    /// Collector config (JSON or TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Summarize(args) => run_summarize(args).await?,
        Commands::Schema(args) => run_schema(args)?,
        Commands::Describe(args) => run_describe(args)?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CollectorConfig> {
    match path {
        Some(path) => CollectorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(CollectorConfig::default()),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

/// Run the collector over files on disk
async fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let provider: Box<dyn SampleDataProvider> = match &args.samples {
        Some(path) => Box::new(
            FileSampleData::load(path)
                .with_context(|| format!("Failed to load samples {}", path.display()))?,
        ),
        None => Box::new(NoSampleData),
    };
    let collector = VegaUsageCollector::new(config, provider).context("Invalid collector config")?;
    let client = FileSearchClient::new(&args.hits);
    log::debug!("Reading search response from {}", client.path().display());

    let summary = collector
        .fetch(&client)
        .await
        .context("Failed to collect Vega usage")?;
    log::info!(
        "{}: {}",
        collector.collector_type(),
        if summary.is_some() { "usage found" } else { "no usage" }
    );

    if args.markdown {
        print!("{}", report::render_usage_report(&args.hits, summary.as_ref()));
        return Ok(());
    }
    print_json(&summary, args.pretty)
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    let schema = vis_usage_protocol::usage_schema()?;
    print_json(&schema, args.pretty)
}

fn run_describe(args: DescribeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let collector =
        VegaUsageCollector::new(config, NoSampleData).context("Invalid collector config")?;
    let out = serde_json::json!({
        "type": collector.collector_type(),
        "ready": collector.is_ready(),
        "config": collector.config(),
        "search": collector.search_request(),
    });
    print_json(&out, true)
}
