use chrono::Utc;
use clap::Parser;
use color_eyre::Result;
use longview_stats::{
    fetch_all,
    Config,
    HttpTransport,
    OutputMode,
    Presenter,
};
use std::path::PathBuf;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

#[derive(Parser, Debug)]
#[command(name = "longview-stats")]
#[command(about = "Per-host system summaries from the Linode Longview API")]
#[command(version)]
struct Cli {
    /// Longview API keys, one per monitored host
    #[arg(value_name = "API_KEY")]
    keys: Vec<String>,

    /// Load API keys (and the color theme) from a JSON config file
    /// instead of positional arguments
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "config.json"
    )]
    file: Option<PathBuf>,

    /// Print the records as a JSON array
    #[arg(short, long)]
    json: bool,

    /// Render one bordered table per host
    #[arg(short, long)]
    table: bool,

    /// Print unprocessed records as JSON (rendered like --json)
    #[arg(short, long)]
    raw: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json || self.raw {
            OutputMode::Json
        } else if self.table {
            OutputMode::Table
        } else {
            OutputMode::Text
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "longview_stats=debug"
    } else {
        "longview_stats=warn"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        ))
        .with(tracing_error::ErrorLayer::default())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = cli.output_mode();
    let config = Config::resolve(cli.keys, cli.file)?;

    let transport = HttpTransport::new();
    let now = Utc::now().timestamp();
    let mut records = fetch_all(&transport, &config.api_keys, now).await?;

    let presenter = Presenter::new(mode, config.theme);
    println!("{}", presenter.render(&mut records)?);
    Ok(())
}
