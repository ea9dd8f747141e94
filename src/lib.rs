// Watchlist core library entry point.
// Headless editing logic for ranked movie lists and pinned reviews.

pub mod error;
pub mod settings;

// Shared data model
pub mod state;

// Pure logic and collaborator seams
pub mod modules;

pub use error::{Result, WatchlistError};
pub use settings::Settings;

/// Installs the `env_logger` backend for the `log` macros used across the
/// crate, filtered at `settings.log_level`. `RUST_LOG` wins when set.
/// Returns false if a logger was already installed.
pub fn init_logging(settings: &Settings) -> bool {
    let level = settings.log_level.as_str();
    let env = env_logger::Env::default().default_filter_or(level);
    let installed = env_logger::Builder::from_env(env).try_init().is_ok();
    if installed {
        log::info!("[Watchlist] Logging initialized at level {}", level);
    }
    installed
}
