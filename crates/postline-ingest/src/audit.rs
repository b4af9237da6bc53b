// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automation audit trail writer.

use std::sync::Arc;

use postline_core::{AutomationLogEntry, BlogStore, LogStatus, NewAutomationLog, PostlineError};
use serde_json::Value;

/// Appends one automation log entry per ingestion attempt.
///
/// The workflow name is fixed at construction. Whether a failed write is
/// fatal is the caller's decision; this type only reports it.
#[derive(Clone)]
pub struct AuditLogWriter {
    store: Arc<dyn BlogStore>,
    workflow_name: String,
}

impl AuditLogWriter {
    pub fn new(store: Arc<dyn BlogStore>, workflow_name: impl Into<String>) -> Self {
        Self {
            store,
            workflow_name: workflow_name.into(),
        }
    }

    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Record an attempt. `payload` is the canonical input, `result` the outcome.
    pub async fn record(
        &self,
        execution_id: Option<&str>,
        status: LogStatus,
        payload: &Value,
        result: Value,
    ) -> Result<AutomationLogEntry, PostlineError> {
        self.store
            .append_automation_log(&NewAutomationLog {
                workflow_name: self.workflow_name.clone(),
                execution_id: execution_id.map(str::to_string),
                status,
                payload: payload.clone(),
                result,
            })
            .await
    }
}
