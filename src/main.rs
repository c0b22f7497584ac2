use std::fs::File;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use portal::api::{ApiClient, Catalog, CatalogClient};
use portal::core::config;
use portal::core::profile::{ProfileOrchestrator, ProfilePhase};
use portal::core::roster::RosterStore;

#[derive(Parser)]
#[command(name = "portal", about = "Browser for a fictional-universe media catalog")]
struct Args {
    /// Override the catalog API base URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a page of characters
    Characters {
        /// 1-based page number (default: first page)
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show one character's profile, episodes included
    Character { id: u32 },
    /// List a page of locations
    Locations {
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// List a page of episodes
    Episodes {
        #[arg(short, long)]
        page: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to portal.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("portal.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("warning: {e}");
        config::PortalConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref());
    log::info!("Portal starting up against {}", resolved.base_url);

    let catalog: Arc<dyn Catalog> =
        Arc::new(CatalogClient::new(ApiClient::new(resolved.base_url)));

    match args.command {
        Command::Characters { page } => list_characters(catalog, page).await,
        Command::Character { id } => show_profile(catalog, id).await,
        Command::Locations { page } => list_locations(catalog, page).await,
        Command::Episodes { page } => list_episodes(catalog, page).await,
    }

    Ok(())
}

async fn list_characters(catalog: Arc<dyn Catalog>, page: Option<u32>) {
    let store = RosterStore::new(catalog);
    store.fetch_characters(page).await;

    let state = store.state();
    if let Some(error) = state.error {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
    for character in &state.characters {
        println!(
            "#{:<4} {} ({}, {})",
            character.id, character.name, character.status, character.species
        );
    }
}

async fn show_profile(catalog: Arc<dyn Catalog>, id: u32) {
    let orchestrator = ProfileOrchestrator::new(catalog, id);
    orchestrator.load().await;

    let state = orchestrator.state();
    match state.phase {
        ProfilePhase::NotFound => {
            eprintln!("character {id} does not exist");
            std::process::exit(1);
        }
        ProfilePhase::Error => {
            let message = state
                .error
                .unwrap_or_else(|| "failed to load character".to_string());
            eprintln!("error: {message}");
            std::process::exit(1);
        }
        ProfilePhase::Loading | ProfilePhase::Success => {}
    }

    if let Some(character) = state.character {
        println!("{} [{}]", character.name, character.status);
        println!("species:  {}", character.species);
        println!(
            "gender:   {}",
            character.gender.as_deref().unwrap_or("Unknown")
        );
        println!("origin:   {}", character.origin.name);
        println!("location: {}", character.location.name);

        if let Some(err) = state.episodes_error {
            println!("episodes: unavailable ({err})");
        } else if state.episodes.is_empty() {
            println!("episodes: none");
        } else {
            println!("episodes:");
            for episode in &state.episodes {
                println!(
                    "  {:<7} {} (aired {})",
                    episode.episode, episode.name, episode.air_date
                );
            }
        }
    }
}

async fn list_locations(catalog: Arc<dyn Catalog>, page: Option<u32>) {
    match catalog.locations(page).await {
        Ok(page) => {
            for location in &page.results {
                println!("#{:<4} {} ({})", location.id, location.name, location.dimension);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

async fn list_episodes(catalog: Arc<dyn Catalog>, page: Option<u32>) {
    match catalog.episodes(page).await {
        Ok(page) => {
            for episode in &page.results {
                println!(
                    "#{:<4} {:<7} {} (aired {})",
                    episode.id, episode.episode, episode.name, episode.air_date
                );
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
