//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Generates a unique snowflake-like resource id.
///
/// Values start well above the counter so they look like Discord ids in
/// test output and never collide with each other within a process.
pub fn next_resource_id() -> String {
    (1_100_000_000_000_000_000 + next_id()).to_string()
}
