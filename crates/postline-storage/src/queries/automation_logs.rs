// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only automation log operations.

use postline_core::types::now_timestamp;
use postline_core::{AutomationLogEntry, LogStatus, NewAutomationLog, PostlineError};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

fn json_column(idx: usize, raw: &str) -> Result<serde_json::Value, rusqlite::Error> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Append an entry and return it with its assigned id.
pub async fn append(
    db: &Database,
    entry: &NewAutomationLog,
) -> Result<AutomationLogEntry, PostlineError> {
    let payload = serde_json::to_string(&entry.payload).map_err(|e| PostlineError::Storage {
        source: Box::new(e),
    })?;
    let result = serde_json::to_string(&entry.result).map_err(|e| PostlineError::Storage {
        source: Box::new(e),
    })?;
    let mut stored = AutomationLogEntry {
        id: 0,
        workflow_name: entry.workflow_name.clone(),
        execution_id: entry.execution_id.clone(),
        status: entry.status,
        payload: entry.payload.clone(),
        result: entry.result.clone(),
        created_at: now_timestamp(),
    };

    let workflow_name = stored.workflow_name.clone();
    let execution_id = stored.execution_id.clone();
    let status = stored.status.to_string();
    let created_at = stored.created_at.clone();
    stored.id = db
        .connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO automation_logs (workflow_name, execution_id, status, payload, result, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![workflow_name, execution_id, status, payload, result, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(stored)
}

/// List the most recent entries, newest first.
pub async fn list_recent(
    db: &Database,
    limit: u32,
) -> Result<Vec<AutomationLogEntry>, PostlineError> {
    let limit = i64::from(limit);
    db.connection()
        .call(move |conn| -> Result<Vec<AutomationLogEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, workflow_name, execution_id, status, payload, result, created_at
                 FROM automation_logs ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                let status: String = row.get(3)?;
                let payload: String = row.get(4)?;
                let result: String = row.get(5)?;
                Ok(AutomationLogEntry {
                    id: row.get(0)?,
                    workflow_name: row.get(1)?,
                    execution_id: row.get(2)?,
                    status: status.parse::<LogStatus>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    payload: json_column(4, &payload)?,
                    result: json_column(5, &result)?,
                    created_at: row.get(6)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
