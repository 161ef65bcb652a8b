//! Telemetry helpers for applications embedding `chart-config-rs`.
//!
//! Resolution diagnostics (malformed items, formatter lookup misses, boundary
//! fetches) are emitted through `tracing`. Hosts either call one of the
//! initializers below or wire their own subscriber.

/// Initializes an env-filtered compact subscriber (`RUST_LOG`, falling back to `info`).
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber was already installed by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_directive("info")
}

/// Same as [`init_default_tracing`] but with an explicit fallback directive,
/// e.g. `"chart_config=debug"`, used when `RUST_LOG` is unset or invalid.
#[must_use]
pub fn init_tracing_with_directive(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}
