//! recipe-box binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use recipe_box::api::{self, AppState};
use recipe_box::cli::{self, Args};
use recipe_box::{logging, Config, FavoritesStore, RecipeCatalog};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run 'recipe-box --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&args)?;
    let _ = logging::init_with_level(config.log_filter());

    info!("recipe-box v{}", env!("CARGO_PKG_VERSION"));

    let catalog = RecipeCatalog::from_file(&config.recipes.catalog)?;

    let favorites = FavoritesStore::from_path(config.favorites.path.as_deref())?;
    info!(favorites = favorites.count(), "favorites loaded");

    let server = config.to_server_config()?;
    let state = AppState::new(catalog).with_favorites(Arc::new(favorites));
    api::serve(server, state).await?;
    Ok(())
}
