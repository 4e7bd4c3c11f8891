use easyloop::config::Config;
use easyloop::models::loop_record::LoopRequest;
use easyloop::models::TargetUnit;
use easyloop::services::navigation::export_stops;
use easyloop::AppState;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        "\
Usage: loopgen --address=TEXT (--distance=KM | --duration=MIN) [OPTIONS]

Options:
  --address=TEXT   Start address, resolved with the configured geocoder
  --distance=KM    Target loop length in kilometers
  --duration=MIN   Target walking time in minutes (5 km/h)
  --seed=N         Fixed bearing seed for a reproducible far point
  --json           Print the loop as JSON
  --help           Show this help message"
    );
}

fn parse_request(args: &[String]) -> Result<LoopRequest, String> {
    let address = args
        .iter()
        .find_map(|a| a.strip_prefix("--address="))
        .ok_or("--address is required")?
        .to_string();

    let distance = args.iter().find_map(|a| a.strip_prefix("--distance="));
    let duration = args.iter().find_map(|a| a.strip_prefix("--duration="));

    let (raw, unit) = match (distance, duration) {
        (Some(d), None) => (d, TargetUnit::Distance),
        (None, Some(d)) => (d, TargetUnit::Duration),
        _ => return Err("Exactly one of --distance or --duration is required".to_string()),
    };

    // Non-numeric input becomes NaN and is rejected as an invalid target
    let value = raw.parse().unwrap_or(f64::NAN);

    Ok(LoopRequest {
        address,
        value,
        unit,
        origin: None,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easyloop=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return ExitCode::SUCCESS;
    }

    let request = match parse_request(&args) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(seed) = args
        .iter()
        .find_map(|a| a.strip_prefix("--seed="))
        .and_then(|s| s.parse().ok())
    {
        config.bearing_seed = Some(seed);
    }

    let state = AppState::from_config(&config);

    let record = match state.loop_generator.generate(&request).await {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("Generation failed: {}", e);
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    if args.iter().any(|a| a == "--json") {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize loop: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("Loop from {}", record.address);
    println!("  requested: {}", record.target_label());
    println!(
        "  routed:    {}, {}",
        record.distance_label(),
        record.duration_label()
    );
    println!("  stops:     {}", export_stops(&record.path).len());
    println!("  navigate:  {}", state.navigation.deep_link(&record));

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("loopgen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_distance_request() {
        let request = parse_request(&args(&["--address=Paris", "--distance=5.5"])).unwrap();
        assert_eq!(request.address, "Paris");
        assert_eq!(request.value, 5.5);
        assert_eq!(request.unit, TargetUnit::Distance);
    }

    #[test]
    fn parses_duration_request() {
        let request = parse_request(&args(&["--address=Lyon", "--duration=45"])).unwrap();
        assert_eq!(request.unit, TargetUnit::Duration);
        assert_eq!(request.value, 45.0);
    }

    #[test]
    fn non_numeric_target_becomes_nan() {
        let request = parse_request(&args(&["--address=Lyon", "--distance=far"])).unwrap();
        assert!(request.value.is_nan());
    }

    #[test]
    fn rejects_missing_or_conflicting_target() {
        assert!(parse_request(&args(&["--address=Lyon"])).is_err());
        assert!(parse_request(&args(&["--address=Lyon", "--distance=5", "--duration=60"])).is_err());
        assert!(parse_request(&args(&["--distance=5"])).is_err());
    }
}
