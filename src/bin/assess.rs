use scalewise::config::Config;
use scalewise::constants::DEFAULT_ISOCHRONE_MINUTES;
use scalewise::models::{Assessment, AssessmentOutcome, AssessmentRequest, RiskLookup};
use scalewise::AppState;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        "\
Usage: assess --from=\"City, ST\" --to=\"City, ST\" --party=NAME [OPTIONS]

One-shot shipment assessment against the local catalog and latest ratings.

Options:
  --from=LOCATION       Ship-from city and state
  --to=LOCATION         Ship-to city and state
  --party=NAME          Liable party name
  --isochrone[=MINUTES] Also list facilities within this drive time of the origin
                        (default {} min)
  --json                Output the assessment as JSON
  --help                Show this help message",
        DEFAULT_ISOCHRONE_MINUTES
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Quiet by default; the result goes to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scalewise=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let arg = |prefix: &str| {
        args.iter()
            .find_map(|a| a.strip_prefix(prefix))
            .map(str::to_string)
    };
    let (Some(ship_from), Some(ship_to), Some(liable_party)) =
        (arg("--from="), arg("--to="), arg("--party="))
    else {
        print_help();
        std::process::exit(2);
    };
    let isochrone_minutes = match arg("--isochrone=") {
        Some(raw) => Some(
            raw.parse::<u32>()
                .map_err(|_| format!("Invalid --isochrone value: {}", raw))?,
        ),
        None if args.iter().any(|a| a == "--isochrone") => Some(DEFAULT_ISOCHRONE_MINUTES),
        None => None,
    };
    let json_output = args.iter().any(|a| a == "--json");

    let config = Config::from_env().map_err(|e| format!("Config error: {}", e))?;
    let state = AppState::from_config(&config)?;

    let request = AssessmentRequest {
        ship_from,
        ship_to,
        liable_party,
        isochrone_minutes,
    };
    let outcome = state.assessments.assess(&request).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        AssessmentOutcome::Assessed(assessment) => print_report(&assessment),
        AssessmentOutcome::Unresolved { unresolved } => {
            for location in &unresolved {
                eprintln!(
                    "Could not determine coordinates for {} '{}'",
                    location.field, location.query
                );
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn describe(lookup: &RiskLookup) -> String {
    match lookup.incident_count {
        Some(count) => format!(
            "{:.3} ({}, {} incidents)",
            lookup.risk_score, lookup.risk_rating, count
        ),
        None => format!("{:.3} ({}, no history)", lookup.risk_score, lookup.risk_rating),
    }
}

fn print_report(assessment: &Assessment) {
    let shipment = &assessment.shipment;
    println!("Shipment:        {}", shipment.route_key);
    println!("Liable party:    {}", shipment.liable_party);
    println!("Route risk:      {}", describe(&assessment.risk.route));
    println!("Party risk:      {}", describe(&assessment.risk.liable_party));

    match assessment.facility {
        Some(ref selection) => {
            let cost = &selection.candidate.cost;
            println!("Best facility:   {}", selection.facility());
            println!("  Address:       {}", selection.facility().address);
            println!(
                "  Detour:        {:.1} mi ({:.1}% deviation, cap {:.0}%)",
                cost.detour_distance_miles,
                selection.candidate.path_deviation * 100.0,
                selection.deviation_cap * 100.0
            );
            println!("  Detour cost:   ${:.2}", cost.total_cost);
        }
        None => println!("Best facility:   none within the route corridor"),
    }

    if let Some(ref in_range) = assessment.facilities_in_range {
        println!("In drive range:  {} facilities", in_range.len());
        for facility in in_range.iter().take(10) {
            println!("  - {}", facility);
        }
    }

    let rec = &assessment.recommendation;
    println!();
    println!(
        "Recommendation:  {} ({} confidence)",
        if rec.should_scale { "SCALE" } else { "DO NOT SCALE" },
        rec.confidence
    );
    println!("  {}", rec.reason);
}
