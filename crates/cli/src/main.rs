use clap::Parser;
use iterdig_domain::{CliOverrides, DomainName, RecordType};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};

mod bootstrap;
mod output;
mod wiring;

#[derive(Parser)]
#[command(name = "iterdig")]
#[command(version)]
#[command(about = "Iterative DNS resolver with optional DNSSEC validation")]
struct Cli {
    /// Domain name to resolve
    name: String,

    /// Record type
    #[arg(
        default_value = "A",
        ignore_case = true,
        value_parser = ["A", "MX", "NS", "SOA", "DNSKEY"]
    )]
    record_type: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Validate the DNSSEC chain of trust from the root
    #[arg(long)]
    dnssec: bool,

    /// Per-query timeout in milliseconds
    #[arg(long, value_name = "N")]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cli_overrides = CliOverrides {
        dnssec: cli.dnssec.then_some(true),
        timeout_ms: cli.timeout_ms,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);
    bootstrap::log_config(&config, cli.config.as_deref());

    info!("Starting iterdig v{}", env!("CARGO_PKG_VERSION"));

    let name = DomainName::parse(&cli.name)?;
    let record_type: RecordType = cli
        .record_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let resolver = wiring::build_resolver(&config)?;

    let start = Instant::now();
    let response = resolver.resolve(&name, record_type).await.map_err(|e| {
        error!(name = %name, error = %e, "Resolution failed");
        e
    })?;

    let report = output::Report {
        name: &name,
        record_type,
        response: &response,
        elapsed: start.elapsed(),
        when: chrono::Local::now(),
        dnssec: resolver.settings().dnssec,
    };
    print!("{}", report.render());

    Ok(())
}
