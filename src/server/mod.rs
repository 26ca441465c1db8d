//! Rename coordinator backend.
//!
//! Accepts rename requests for Discord channels and categories, coalesces them per
//! resource, and applies them through a durable, database-backed queue that retries
//! with exponential backoff.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and validation
//! - **Service Layer** (`service/`) - Coalescing, the rename worker, queue settlement and the Discord client
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models for pending names and rename jobs
//! - **Error Layer** (`error/`) - Application error types, the rename failure taxonomy, and HTTP response mapping
//! - **Middleware** (`middleware/`) - Producer authentication guard
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state
//! - **Startup** (`startup`) - Logging, database and HTTP client initialization
//! - **Router** (`router`) - Axum route configuration
//! - **Scheduler** (`scheduler/`) - Queue runner and housekeeping on tokio-cron-scheduler
//!
//! # Rename Flow
//!
//! 1. **Controller** authenticates the producer and validates the request
//! 2. **Coalescer** overwrites the pending name and enqueues a job if none is active
//! 3. **Scheduler** claims due jobs and runs a worker attempt for each
//! 4. **Worker** re-reads the pending name, checks the local permit, calls Discord
//! 5. **Queue** settles the outcome: success, retry with backoff, failure or abandonment

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
