//! Command-line interface parsing and handling
//!
//! Every subcommand shares one token store and one API client; the
//! interactive UI is the default when no subcommand is given.

pub mod account;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::ApiClient;
use crate::core::config::Config;
use crate::core::router::Route;
use crate::core::session::SessionController;
use crate::core::token_store::{KeyringTokenStore, MemoryTokenStore, TokenStore};
use crate::ui::event_loop::run_ui;
use crate::utils::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "evolance")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Terminal client for the Evolance personal growth service")]
#[command(
    long_about = "Evolance is a full-screen terminal client for the Evolance service: \
sign in, complete the personality questionnaire, follow your stories and tasks, \
talk with your guide, listen to lessons and track your decisions.\n\n\
Environment Variables:\n\
  EVOLANCE_BACKEND_URL   Backend origin (overrides the backend-url setting)\n\
  EVOLANCE_LOG           Log filter used with --log (e.g. evolance=debug)\n\n\
Controls:\n\
  F1-F5             Dashboard, Chat, Lessons, Timeline, Profile\n\
  r                 Retry a screen that failed to load\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostics to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Keep the session token in memory instead of the system keyring
    #[arg(long, global = true)]
    pub no_keyring: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the terminal interface (default)
    Ui {
        /// Screen to open first, e.g. /chat
        #[arg(long, value_name = "PATH")]
        route: Option<String>,
    },
    /// Sign in and remember the session
    Login { email: String },
    /// Create an account and sign in
    Register {
        email: String,
        /// Full name; prompted for when omitted
        #[arg(trailing_var_arg = true)]
        full_name: Vec<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show which screen a path leads to for the current session
    Route { path: String },
    /// Show the current configuration
    Config,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: String,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

fn token_store(no_keyring: bool) -> Arc<dyn TokenStore> {
    if no_keyring {
        Arc::new(MemoryTokenStore::new())
    } else {
        Arc::new(KeyringTokenStore::new())
    }
}

/// Load the config and wire a session controller to the configured backend.
fn connect(no_keyring: bool) -> Result<(Config, Arc<SessionController>), Box<dyn Error>> {
    let config = Config::load()?;
    let api_base = config.api_base();
    debug!(api_base = %api_base, "using backend");
    let client = ApiClient::new(api_base, token_store(no_keyring));
    Ok((config, Arc::new(SessionController::new(client))))
}

fn requested_route(path: Option<&str>) -> Option<Route> {
    let path = path?;
    let route = Route::from_path(path);
    if route.is_none() {
        eprintln!("⚠️  Unknown route {path}; opening the default screen");
    }
    route
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Ui { route: None });
    init_tracing(args.log.as_deref(), matches!(command, Commands::Ui { .. }))?;

    match command {
        Commands::Ui { route } => {
            let (config, session) = connect(args.no_keyring)?;
            let path = route.or(config.start_route);
            run_ui(session, requested_route(path.as_deref())).await
        }
        Commands::Login { email } => {
            let (_, session) = connect(args.no_keyring)?;
            account::login(&session, &email).await
        }
        Commands::Register { email, full_name } => {
            let (_, session) = connect(args.no_keyring)?;
            account::register(&session, &email, &full_name.join(" ")).await
        }
        Commands::Logout => {
            let (_, session) = connect(args.no_keyring)?;
            account::logout(&session)
        }
        Commands::Whoami => {
            let (_, session) = connect(args.no_keyring)?;
            account::whoami(&session).await
        }
        Commands::Route { path } => {
            let (_, session) = connect(args.no_keyring)?;
            account::route(&session, &path).await
        }
        Commands::Config => settings::show(),
        Commands::Set { key, value } => settings::set(&key, &value),
        Commands::Unset { key } => settings::unset(&key),
    }
}
