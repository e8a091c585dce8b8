// Copyright 2024-2026 Model Gateway Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for the gateway client binary.
//!
//! ## Usage
//!
//! ```bash
//! gateway-client                       # Rewrite the demo question
//! gateway-client standalone "Q" "H"    # Rewrite Q given history H
//! gateway-client generate "PROMPT" 64  # Raw generation
//! gateway-client config show           # Effective configuration
//! ```

pub mod config_cmd;
pub mod generate_cmd;

pub use generate_cmd::{run_generate, run_standalone, DEMO_QUERY};

/// Command completed.
pub const EXIT_SUCCESS: i32 = 0;
/// The generate request failed.
pub const EXIT_REQUEST_FAILURE: i32 = 1;
/// Bad arguments or configuration.
pub const EXIT_USAGE: i32 = 2;

/// Parse an optional `max_tokens` argument.
///
/// Returns `Ok(default)` when absent, `Err` with a message when the value is
/// not a positive integer.
pub fn parse_max_tokens(arg: Option<&str>, default: u32) -> Result<u32, String> {
    match arg {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(0) => Err("max_tokens must be positive".to_string()),
            Ok(n) => Ok(n),
            Err(_) => Err(format!("invalid max_tokens: {raw}")),
        },
    }
}
