//! Factory methods for creating test data.
//!
//! Each table has its own factory module with a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let target = factory::pending_rename::create_pending_rename(&db, "123", "Alpha").await?;
//!
//! let job = factory::rename_job::RenameJobFactory::new(&db)
//!     .resource_id("123")
//!     .state("retry_scheduled")
//!     .attempts_made(2)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `pending_rename` - Create pending rename targets
//! - `rename_job` - Create rename job rows in any state
//! - `helpers` - Unique id generation

pub mod helpers;
pub mod pending_rename;
pub mod rename_job;

pub use pending_rename::create_pending_rename;
pub use rename_job::create_rename_job;
