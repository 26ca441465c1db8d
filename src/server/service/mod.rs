//! Service layer for business logic and orchestration.
//!
//! Services sit between the controller layer and the data (repository) layer. They
//! work with domain models, coordinate repository calls with the outbound Discord
//! client, and decide how each rename attempt moves its job forward.

pub mod rename;
