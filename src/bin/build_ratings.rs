use scalewise::config::{Config, RatingsConfig};
use scalewise::data::load_incidents;
use scalewise::ratings::{RatingsArtifact, RatingsStore, RiskRatingBuilder};
use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        "\
Usage: build_ratings [OPTIONS]

Rebuild route, liable-party and loss-location risk ratings from incident
history and publish them as the latest ratings artifact.

Options:
  --input=PATH          Incident history JSON (default: INCIDENT_HISTORY_PATH)
  --out-dir=DIR         Artifact directory (default: RATINGS_DIR)
  --route-blend=MODE    loss_location | two_factor (default: RATINGS_ROUTE_BLEND)
  --dry-run             Build and print the summary without publishing
  --help                Show this help message"
    );
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scalewise=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        tracing::error!("Rating build failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let config = Config::from_env().map_err(|e| format!("Config error: {}", e))?;

    let input = args
        .iter()
        .find_map(|a| a.strip_prefix("--input="))
        .map(str::to_string)
        .unwrap_or_else(|| config.incident_history_path.clone());
    let out_dir = args
        .iter()
        .find_map(|a| a.strip_prefix("--out-dir="))
        .map(str::to_string)
        .unwrap_or_else(|| config.ratings_dir.clone());
    let route_blend = match args.iter().find_map(|a| a.strip_prefix("--route-blend=")) {
        Some(raw) => raw.parse()?,
        None => config.ratings.route_blend,
    };
    let dry_run = args.iter().any(|a| a == "--dry-run");

    let incidents = load_incidents(&input)?;
    let builder = RiskRatingBuilder::new(RatingsConfig {
        route_blend,
        ..config.ratings.clone()
    });
    let build = builder.build(&incidents);

    let now = OffsetDateTime::now_utc();
    let artifact = RatingsArtifact::from_build(build, now);

    eprintln!(
        "Rated {} routes, {} liable parties, {} loss locations from {} relevant of {} incidents",
        artifact.tables.routes.len(),
        artifact.tables.liable_parties.len(),
        artifact.tables.loss_locations.len(),
        artifact.relevant_incident_count,
        artifact.incident_count_total
    );

    if dry_run {
        eprintln!("Dry run: nothing published");
        return Ok(());
    }

    let path = RatingsStore::new(&out_dir).publish(&artifact, now)?;
    println!("{}", path.display());
    Ok(())
}
