pub mod api;
pub mod app;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;
pub mod ui;

pub use api::ApiClient;
pub use app::{router, shutdown_on};
pub use config::Config;
pub use state::AppState;
pub use store::Store;
