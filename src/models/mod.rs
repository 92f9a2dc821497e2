//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod contest;
pub mod entity;
pub mod event;
pub mod membership;
pub mod outcome;
pub mod pick;

pub use contest::*;
pub use entity::*;
pub use event::*;
pub use membership::*;
pub use outcome::*;
pub use pick::*;
