use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use research_paper_finder::config::{find_config_file, get_config, load_config, Config};
use research_paper_finder::models::DEFAULT_MAX_RESULTS;
use research_paper_finder::output::{self, ConsoleSink, CsvSink, RecordSink};
use research_paper_finder::{PaperFinder, PubMedClient};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Research Paper Finder - Find PubMed papers with pharmaceutical/biotech company authors
#[derive(Parser, Debug)]
#[command(name = "research-paper-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Find PubMed papers with authors affiliated with pharmaceutical or biotech companies", long_about = None)]
struct Cli {
    /// PubMed search query (full PubMed query syntax supported)
    query: String,

    /// NCBI API key (falls back to NCBI_API_KEY)
    #[arg(long, short = 'a')]
    api_key: Option<String>,

    /// Maximum number of results to retrieve
    #[arg(long, short = 'm', default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Save results to this CSV file instead of printing them
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Print debug information during execution
    #[arg(long, short = 'd')]
    debug: bool,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format for console results
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides configuration)
    #[arg(long)]
    timeout: Option<u64>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> output::OutputFormat {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => output::OutputFormat::Table,
            OutputFormat::Auto => output::OutputFormat::Json,
            OutputFormat::Table => output::OutputFormat::Table,
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Plain => output::OutputFormat::Plain,
        }
    }
}

impl Cli {
    /// Log level from the flags, with `verbose` from configuration acting like `-v`
    fn log_level(&self, config_verbose: bool) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 if self.debug || config_verbose => "debug",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Apply command-line overrides on top of loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(timeout) = self.timeout {
            config.eutils.timeout_secs = timeout;
        }
        if self.debug || self.verbose > 0 {
            config.verbose = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations.
    // This happens before tracing is set up so `verbose` can pick the level.
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => get_config(),
    };
    let config_verbose = config.verbose;
    cli.apply_to(&mut config);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                format!("research_paper_finder={}", cli.log_level(config_verbose))
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    tracing::debug!("Query: {}", cli.query);
    tracing::debug!("Max results: {}", cli.max_results);
    tracing::debug!("Output file: {:?}", cli.file);

    let client = PubMedClient::from_config(&config)?;
    let finder = PaperFinder::new(client);

    let mut sink: Box<dyn RecordSink> = match &cli.file {
        Some(path) => Box::new(CsvSink::new(path)),
        None => Box::new(ConsoleSink::stdout(cli.output.resolve())),
    };

    finder
        .run(&cli.query, cli.max_results, sink.as_mut())
        .await?;

    Ok(())
}
