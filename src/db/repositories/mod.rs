//! Database repositories
//!
//! Repositories handle all direct database interactions. Functions that
//! take a generic executor run against the pool or inside a transaction;
//! those taking `&mut PgConnection` issue several statements and must be
//! given a transaction.

pub mod contest_repo;
pub mod entity_repo;
pub mod event_repo;
pub mod membership_repo;
pub mod outcome_repo;
pub mod pick_repo;

pub use contest_repo::{ContestRepository, MemberUsage};
pub use entity_repo::EntityRepository;
pub use event_repo::EventRepository;
pub use membership_repo::MembershipRepository;
pub use outcome_repo::OutcomeRepository;
pub use pick_repo::PickRepository;
