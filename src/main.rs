use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use waypath::{LoaderConfig, RouteFinder};

/// Shortest routes between locations of an edge list graph
#[derive(Parser, Debug)]
#[command(name = "waypath")]
#[command(about = "Find shortest routes between locations", long_about = None)]
struct Args {
    /// Edge list file with lines like "A" -> "B" [seconds=12.5];
    #[arg(short, long, default_value = "campus.dot")]
    graph: PathBuf,

    /// Fail on lines that are not edges, comments or graph delimiters
    #[arg(long)]
    strict: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every location
    Locations,
    /// Shortest path between two locations
    Path { from: String, to: String },
    /// Cost of the shortest path in seconds
    Cost { from: String, to: String },
    /// Travel time of each hop and the total in minutes
    Times { from: String, to: String },
    /// Reachable location farthest from a starting point
    Farthest { from: String },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting waypath v{}", env!("CARGO_PKG_VERSION"));
    let (finder, summary) = RouteFinder::load(&args.graph, LoaderConfig { strict: args.strict })?;
    debug!(?summary, "graph loaded");

    match args.command {
        Command::Locations => {
            let locations = finder.locations();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&locations)?);
            } else {
                for location in locations {
                    println!("{location}");
                }
            }
        }
        Command::Path { from, to } => {
            let path = finder.find_shortest_path(&from, &to)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&path)?);
            } else {
                println!("{}", path.join(" -> "));
            }
        }
        Command::Cost { from, to } => {
            let cost = finder.total_travel_time(&from, &to);
            if args.json {
                // JSON has no infinity
                let value = if cost.is_finite() { json!(cost) } else { json!(null) };
                println!("{}", json!({ "from": from, "to": to, "seconds": value }));
            } else if cost.is_finite() {
                println!("{cost}");
            } else {
                println!("unreachable");
            }
        }
        Command::Times { from, to } => {
            let route = finder.route(&from, &to)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                for (hop, seconds) in route.path.windows(2).zip(&route.segments) {
                    println!("{} -> {}: {seconds}s", hop[0], hop[1]);
                }
                println!("{:.2} minutes", route.total_minutes());
            }
        }
        Command::Farthest { from } => {
            let farthest = finder.most_distant_location(&from)?;
            if args.json {
                println!("{}", json!({ "from": from, "farthest": farthest }));
            } else {
                match farthest {
                    Some(location) => println!("{location}"),
                    None => println!("All locations are unreachable"),
                }
            }
        }
    }

    Ok(())
}
