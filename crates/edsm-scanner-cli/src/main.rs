use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use edsm_scanner_cli::output::{render_fields, render_rows, OutputFormat};
use edsm_scanner_cli::scan::{run_scan, ScanOptions};
use edsm_scanner_lib::{
    BodyFilter, EdsmClient, FieldFilter, ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_SEARCH_RADIUS,
    MAX_SEARCH_RADIUS,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find star systems around an origin or along a corridor using EDSM",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// System to search around, or the start of the corridor.
    #[arg(required = true)]
    origin: Option<String>,

    /// End of the corridor. Without it only the origin's neighbourhood is scanned.
    destination: Option<String>,

    /// Sphere radius in light-years (at most 100).
    #[arg(short = 'r', long, default_value_t = DEFAULT_SEARCH_RADIUS)]
    scan_radius: f64,

    /// Maximum number of systems to print.
    #[arg(long)]
    max_systems: Option<usize>,

    /// Fetch the bodies of every printed system.
    #[arg(short = 'b', long)]
    include_bodies: bool,

    /// Maximum detail requests in flight.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Only keep systems matching `<Field> <op> <value>`, e.g. "DiscoveredStars > 1".
    /// May be repeated; see `edsm-scanner fields`.
    #[arg(short = 's', long = "filter-system", value_name = "FILTER")]
    filters: Vec<FieldFilter>,

    /// Only keep systems with at least one body matching every `<Field> <op> <value>`,
    /// e.g. "SurfacePressure > 0" or "RingTypes == Icy". May be repeated.
    #[arg(short = 'f', long = "filter-body", value_name = "FILTER")]
    body_filters: Vec<BodyFilter>,

    /// Order the output as a journey, always visiting the nearest remaining system next.
    #[arg(short = 'p', long)]
    plot_journey: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the fields usable in --filter-system and --filter-body expressions.
    Fields,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Fields) => handle_fields(),
        None => handle_scan(cli),
    }
}

fn handle_fields() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_fields(&mut out).context("failed to write field listing")?;
    Ok(())
}

fn handle_scan(cli: Cli) -> Result<()> {
    let Some(origin) = cli.origin else {
        bail!("an origin system is required");
    };
    if !(cli.scan_radius > 0.0 && cli.scan_radius <= MAX_SEARCH_RADIUS) {
        bail!(
            "scan radius must be greater than 0 and at most {}ly, got {}",
            MAX_SEARCH_RADIUS,
            cli.scan_radius
        );
    }

    let mut config = ScanConfig::default()
        .with_radius(cli.scan_radius)
        .with_concurrency(cli.concurrency);
    if let Some(max_systems) = cli.max_systems {
        config = config.with_max_results(max_systems);
    }

    let options = ScanOptions {
        origin,
        destination: cli.destination,
        config,
        include_bodies: cli.include_bodies,
        filters: cli.filters,
        body_filters: cli.body_filters,
        plot_journey: cli.plot_journey,
    };

    let client = EdsmClient::from_env().context("failed to build the EDSM client")?;
    info!(api = client.base_url(), "using EDSM API");
    let rows = run_scan(&client, &options)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_rows(&mut out, &rows, cli.format).context("failed to write scan results")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
