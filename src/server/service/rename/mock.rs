use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};

use crate::server::{error::rename::RenameError, service::rename::client::RenameClient};

/// Scripted [`RenameClient`] for tests.
///
/// Returns queued results in order, then `Ok(())` once the script runs out, and
/// records every call.
#[derive(Default)]
pub struct MockRenameClient {
    script: Mutex<VecDeque<Result<(), RenameError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockRenameClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client answering with `results`, in order.
    pub fn scripted(results: impl IntoIterator<Item = Result<(), RenameError>>) -> Self {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(resource_id, name)` of every call so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RenameClient for MockRenameClient {
    async fn rename(&self, resource_id: &str, new_name: &str) -> Result<(), RenameError> {
        self.calls
            .lock()
            .unwrap()
            .push((resource_id.to_string(), new_name.to_string()));

        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
