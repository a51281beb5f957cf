//! Markdown display for models, collections and run results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation results use newtype wrappers so each context
//! can format the same data its own way.
//!
//! - [`collections`]: [`PlanContexts`], [`Tools`], [`Checkpoints`]
//! - [`results`]: `Display` for [`crate::engine::IntentRun`], [`DeleteResult`]
//! - [`datetime`]: [`LocalDateTime`]

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

#[cfg(test)]
mod tests;

pub use collections::{Checkpoints, PlanContexts, Tools};
pub use datetime::LocalDateTime;
pub use results::DeleteResult;
