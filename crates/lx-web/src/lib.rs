//! # lx-web
//!
//! Server-rendered Lifex dashboard: axum routes returning handlebars HTML
//! partials for an HTMX front end. The `lxd` binary wraps this library with a
//! clap CLI.

pub mod error;
pub mod forms;
pub mod routes;
pub mod server;
pub mod state;
pub mod views;

pub use routes::router;
pub use server::serve;
pub use state::AppState;
