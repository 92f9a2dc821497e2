//! Business logic services
//!
//! Services own the units of work: each public operation opens at most one
//! transaction and commits or rolls back as a whole.

pub mod admin_service;
pub mod contest_service;
pub mod entity_service;
pub mod event_service;
pub mod leaderboard_service;
pub mod outcome_service;
pub mod pick_service;

pub use admin_service::AdminService;
pub use contest_service::ContestService;
pub use entity_service::EntityService;
pub use event_service::EventService;
pub use leaderboard_service::LeaderboardService;
pub use outcome_service::OutcomeService;
pub use pick_service::PickService;
