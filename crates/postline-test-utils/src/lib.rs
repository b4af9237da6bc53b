// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Postline integration tests.
//!
//! Provides in-memory adapters and a test harness for fast, deterministic,
//! CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory `BlogStore` with failure injection and call counters
//! - [`RecordingInvalidator`] - `CacheInvalidator` that records every call
//! - [`TestHarness`] - Full router over a temp SQLite database

pub mod harness;
pub mod memory_store;
pub mod recording_invalidator;

pub use harness::TestHarness;
pub use memory_store::MemoryStore;
pub use recording_invalidator::RecordingInvalidator;
