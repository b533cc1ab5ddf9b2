pub mod app;
pub mod chart;
pub mod config;
pub mod controller;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod range;
pub mod source;
pub mod state;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use controller::{RefreshController, RefreshOutcome};
pub use state::AppState;
