//! Tracing initialization for hosts and tests.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Default directive when `RUST_LOG` does not mention this crate.
const DEFAULT_DIRECTIVE: &str = "prefix_shard_index=info";

/// Initialize tracing. Safe to call multiple times.
///
/// Under a test runner the subscriber writes through the test writer at DEBUG so
/// shard routing and split decisions show up in failing test output.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();

        let mut filter = EnvFilter::from_default_env();
        filter = if is_test {
            filter.add_directive(tracing::Level::DEBUG.into())
        } else {
            match DEFAULT_DIRECTIVE.parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => filter,
            }
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .compact();

        let result = if is_test {
            builder.with_test_writer().finish().try_init()
        } else {
            builder.with_writer(std::io::stderr).finish().try_init()
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
