// SPDX-FileCopyrightText: Copyright (c) 2024-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Logging setup.
//!
//! Filters come from the `ZEROPAD_LOG` environment variable using the usual
//! `EnvFilter` directive syntax; the default level is `info`. Output is
//! human readable unless `ZEROPAD_LOGGING_JSONL` is truthy, in which case
//! one JSON object is written per line.
//!
//! Verbose zero-pad records are independent of this setup: they go to the
//! sink configured on the padder.

use std::sync::Once;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding filter directives.
pub const ZEROPAD_LOG: &str = "ZEROPAD_LOG";

/// Environment variable selecting JSONL output.
pub const ZEROPAD_LOGGING_JSONL: &str = "ZEROPAD_LOGGING_JSONL";

/// Default log level
const DEFAULT_FILTER_LEVEL: LevelFilter = LevelFilter::INFO;

/// Once instance to ensure the logger is only initialized once
static INIT: Once = Once::new();

/// Initialize the global subscriber. Later calls are no-ops.
pub fn init() {
    init_with_directives(&[]);
}

/// Like [`init`], with extra filter directives applied on top of `ZEROPAD_LOG`,
/// e.g. `zeropad_compute=debug`.
pub fn init_with_directives(directives: &[&str]) {
    INIT.call_once(|| {
        if let Err(e) = setup_logging(directives) {
            eprintln!("Failed to initialize logging: {}", e);
        }
    });
}

fn setup_logging(directives: &[&str]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer = filters(directives);

    if jsonl_logging_enabled() {
        let l = fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .with_filter(filter_layer);
        tracing_subscriber::registry().with(l).try_init()?;
    } else {
        let l = fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(filter_layer);
        tracing_subscriber::registry().with(l).try_init()?;
    }

    Ok(())
}

fn filters(extra: &[&str]) -> EnvFilter {
    let mut filter_layer = EnvFilter::builder()
        .with_default_directive(DEFAULT_FILTER_LEVEL.into())
        .with_env_var(ZEROPAD_LOG)
        .from_env_lossy();

    for directive in extra {
        match directive.parse::<Directive>() {
            Ok(d) => {
                filter_layer = filter_layer.add_directive(d);
            }
            Err(e) => {
                eprintln!("Failed parsing filter '{directive}': {e}");
            }
        }
    }
    filter_layer
}

fn jsonl_logging_enabled() -> bool {
    std::env::var(ZEROPAD_LOGGING_JSONL).map(|v| is_truthy(&v)).unwrap_or(false)
}

/// Truthy values: "1", "true", "on", "yes" (case-insensitive)
pub(crate) fn is_truthy(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        for v in ["1", "true", "ON", "Yes"] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["0", "false", "", "maybe"] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn test_extra_directives() {
        let filter = filters(&["zeropad_compute=trace", "not a directive=="]);
        assert!(filter.to_string().contains("zeropad_compute=trace"));
    }

    #[test]
    fn test_filter_scopes_to_directive() {
        let subscriber = tracing_subscriber::registry().with(filters(&["zeropad_compute=debug"]));
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "zeropad_compute", tracing::Level::DEBUG));
            assert!(!tracing::enabled!(target: "other_crate", tracing::Level::DEBUG));
        });
    }
}
