// SPDX-FileCopyrightText: 2026 Postline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret comparison for the automation webhook.

use subtle::ConstantTimeEq;

/// Check a received `x-webhook-secret` value against the configured secret.
///
/// Byte strings of different length are rejected immediately; only the
/// length is observable through timing. Equal-length inputs are compared
/// with [`ConstantTimeEq`], which touches every byte regardless of where
/// the first difference sits.
///
/// An empty `expected` secret authenticates nothing, not even an empty
/// header value.
pub fn verify_webhook_secret(received: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let received = received.as_bytes();
    let expected = expected.as_bytes();
    if received.len() != expected.len() {
        return false;
    }
    bool::from(received.ct_eq(expected))
}
