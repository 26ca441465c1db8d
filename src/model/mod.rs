//! Wire-level DTOs shared by the HTTP surface and its callers.

pub mod api;
pub mod rename;
