// Copyright 2024-2026 Model Gateway Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults.
//!
//! These commands read configuration directly from environment variables
//! without contacting the gateway.

use std::io::{self, Write};

use super::{EXIT_REQUEST_FAILURE, EXIT_SUCCESS};
use crate::config::{self, EffectiveConfig};

/// Print effective config as key-value pairs to stdout.
pub fn run_show() -> i32 {
    let cfg = config::load().effective_config();
    finish(print_config(&cfg, &mut io::stdout()))
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() -> i32 {
    finish(print_config(&config::defaults(), &mut io::stdout()))
}

fn finish(result: io::Result<()>) -> i32 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Failed to write configuration: {}", e);
            EXIT_REQUEST_FAILURE
        }
    }
}

fn print_config<W: Write>(cfg: &EffectiveConfig, out: &mut W) -> io::Result<()> {
    for (key, value) in cfg.entries() {
        writeln!(out, "{}={}", key, value)?;
    }
    writeln!(out, "# endpoint: {}", cfg.endpoint_url)?;
    out.flush()
}
