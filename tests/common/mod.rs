// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for the integration test suites.

/// Installs a tracing subscriber writing to the test-captured output.
///
/// Safe to call from every test; only the first call in a binary wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
