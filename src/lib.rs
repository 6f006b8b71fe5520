//! Evolance is a terminal client for the Evolance wellness service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the REST payloads, the bearer-authenticated HTTP client
//!   and typed helpers for each endpoint the client talks to.
//! - [`core`] owns the token store, the session controller, the view router,
//!   the onboarding questionnaire state machine and the application state that
//!   the screens render from.
//! - [`ui`] runs the interactive terminal front-end: screen rendering, key
//!   handling and the event loop that keeps network work off the draw path.
//! - [`cli`] parses command-line arguments and dispatches subcommands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
