use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use theatre_engine::{
    config::Config,
    seed::SeedData,
    services::{Route, ShowOrder},
    AppState,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.app.rust_log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting theatre engine ({})", config.app.environment);

    let seed_path = config.app.seed_path.clone();
    let state = AppState::new(config);

    match seed_path {
        Some(path) => {
            let seed = SeedData::from_file(&path).with_context(|| format!("Failed to read seed file {}", path))?;
            state.load_seed(seed).with_context(|| format!("Failed to apply seed file {}", path))?;
        }
        None => warn!("No seed file configured (THEATRE_APP__SEED_PATH), starting empty"),
    }

    print_report(&state)?;
    Ok(())
}

fn print_report(state: &AppState) -> anyhow::Result<()> {
    println!("== Catalog ==");
    for movie in state.list_movies() {
        println!("{:>4}  {:<30} {:<10} {:>4} min  {:.1}", movie.id, movie.title, movie.genre, movie.duration, movie.rating);
    }

    for (title, order) in [("== Shows by start ==", ShowOrder::ByStart), ("== Shows by revenue ==", ShowOrder::ByRevenue)] {
        println!("\n{}", title);
        for show in state.shows(order) {
            println!(
                "{:>4}  movie {:>3}  venue {:>3}  {} - {}  sold {:>3}  revenue {:.2}",
                show.id, show.movie_id, show.venue_id, show.start, show.end, show.tickets_sold, show.revenue
            );
        }
    }

    for venue in state.list_venues() {
        let (booked, total) = state.occupancy(venue.id)?;
        println!("\n== Venue {} '{}' ({}/{} booked) ==", venue.id, venue.name, booked, total);
        for line in state.seat_map(venue.id)? {
            println!("{}", line);
        }

        println!("Routes:");
        for route in state.routes_from(venue.id)? {
            match route {
                Route::Reachable { to, distance, path } => {
                    let hops: Vec<String> = path.iter().map(|v| v.to_string()).collect();
                    println!("  -> {:>3}  {:>5}  via {}", to, distance, hops.join(" > "));
                }
                Route::Unreachable { to } => println!("  -> {:>3}  unreachable", to),
            }
        }
    }
    Ok(())
}
