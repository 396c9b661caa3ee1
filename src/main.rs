use clap::Parser;
use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zonefile_builder::config::parse_ttl;
use zonefile_builder::{Config, Error, OutputFormat, ZonePlan};

#[derive(Parser)]
#[command(name = "zonefile-builder", version)]
#[command(about = "Render a BIND zone file (or its JSON record list) from a zone plan")]
struct Cli {
    /// JSON zone plan; `-` or omitted reads stdin
    plan: Option<PathBuf>,

    /// Output format: text or json [env: ZONE_FORMAT]
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Zone origin, must end with a period [env: ZONE_DOMAIN]
    #[arg(short, long)]
    domain: Option<String>,

    /// Default TTL in seconds [env: ZONE_TTL]
    #[arg(short, long, value_parser = parse_ttl)]
    ttl: Option<u32>,

    /// Write the zone here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn read_plan(path: Option<&PathBuf>) -> Result<ZonePlan, Error> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            info!(path = %path.display(), "reading zone plan");
            ZonePlan::from_reader(File::open(path)?)
        }
        // nothing piped in: start from an empty zone
        _ if io::stdin().is_terminal() => Ok(ZonePlan::default()),
        _ => {
            info!("reading zone plan from stdin");
            ZonePlan::from_reader(io::stdin().lock())
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut plan = read_plan(cli.plan.as_ref())?;

    let config = Config::resolve(
        Config::from_env()?,
        Config {
            domain: plan.domain.take(),
            ttl: plan.ttl.take(),
            format: None,
        },
        Config {
            domain: cli.domain,
            ttl: cli.ttl,
            format: cli.format,
        },
    );
    plan.domain = config.domain;
    plan.ttl = config.ttl;

    let zone = plan.build()?;
    let rendered = zone.render(config.format.unwrap_or_default())?;

    match cli.output {
        Some(path) => {
            fs::write(&path, rendered)?;
            info!(path = %path.display(), domain = zone.domain(), "zone written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout carries only the zone
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    run(cli)?;

    Ok(())
}
