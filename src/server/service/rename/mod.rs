//! Coalescing rename coordinator.
//!
//! Producers call [`RenameCoalescer::request_rename`]; the queue runner claims due
//! jobs and runs a [`RenameWorker`] attempt for each, then hands the outcome to
//! [`RenameQueue::settle`].

pub mod client;
pub mod coalescer;
pub mod limiter;
pub mod queue;
pub mod worker;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod test;

pub use client::{DiscordRenameClient, RenameClient};
pub use coalescer::RenameCoalescer;
pub use limiter::LocalPermitCheck;
pub use queue::RenameQueue;
pub use worker::{AttemptOutcome, RenameWorker};
