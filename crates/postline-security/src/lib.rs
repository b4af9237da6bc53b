// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security primitives for Postline.
//!
//! Provides constant-time webhook secret verification and secret redaction
//! for process log output.

pub mod redact;
pub mod secret;

pub use redact::{RedactingWriter, redact};
pub use secret::verify_webhook_secret;
