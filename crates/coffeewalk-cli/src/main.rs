mod nearby;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coffeewalk_core::SearchRadius;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "coffeewalk")]
#[command(about = "Find coffee shops within walking distance")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for coffee shops around a coordinate
    Nearby {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Walking radius: near (200 m), medium (500 m) or far (1000 m)
        #[arg(long, default_value_t = SearchRadius::Medium)]
        radius: SearchRadius,
        /// Follow up with a details lookup (website, phone) for each venue
        #[arg(long)]
        details: bool,
        /// Print venues as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the available search radii
    Radii,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Nearby {
            lat,
            lng,
            radius,
            details,
            json,
        }) => {
            let config = coffeewalk_core::load_app_config().context("failed to load config")?;
            init_tracing(&config.log_level);
            tracing::debug!(?config, "configuration loaded");
            let options = nearby::NearbyOptions {
                radius,
                with_details: details,
                json,
            };
            nearby::run_nearby(&config, lat, lng, options).await?;
        }
        Some(Commands::Radii) => {
            for radius in SearchRadius::ALL {
                println!("{}", nearby::format_radius(radius));
            }
        }
        None => println!("coffeewalk: run `coffeewalk --help` for usage"),
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
