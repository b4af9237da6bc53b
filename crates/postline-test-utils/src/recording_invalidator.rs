// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache invalidator that records calls for assertions.

use std::sync::Mutex;

use async_trait::async_trait;
use postline_core::{CacheInvalidator, PostlineError};

/// Records every `invalidate` call. Optionally fails each one after recording it.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An invalidator whose every call errors.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Paths passed to each call, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("invalidator lock poisoned").clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<(), PostlineError> {
        self.calls
            .lock()
            .expect("invalidator lock poisoned")
            .push(paths.to_vec());
        if self.fail {
            return Err(PostlineError::Invalidation {
                message: "injected invalidation failure".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}
