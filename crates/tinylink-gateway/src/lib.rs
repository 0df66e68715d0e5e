//! HTTP front end for the tinylink shortener.

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod state;

pub use app::App;
pub use cli::CLI;
pub use state::AppState;
