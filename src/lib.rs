//! MedalPool - Budget-Constrained Medal Prediction Pool
//!
//! Participants draft a set of countries under a cost budget and are
//! scored on the medals those countries win.
//!
//! # Features
//!
//! - Independent contests per event, each with its own budget and entity cap
//! - Forward-only contest lifecycle: setup, open, locked, complete
//! - Atomic pick replacement with budget, count and duplicate checks
//! - Competition-ranked leaderboards with caller-selected display order
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic and transactions
//! - **Repositories**: Database access
//! - **Scoring**: Storage-free points, validation and ranking rules
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod scoring;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
