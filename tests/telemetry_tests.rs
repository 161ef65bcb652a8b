use chart_config::telemetry::{init_default_tracing, init_tracing_with_directive};

#[cfg(not(feature = "telemetry"))]
#[test]
fn initializers_are_noops_without_the_feature() {
    assert!(!init_default_tracing());
    assert!(!init_tracing_with_directive("chart_config=debug"));
}

#[cfg(feature = "telemetry")]
#[test]
fn only_the_first_initializer_installs_a_subscriber() {
    let _ = init_tracing_with_directive("chart_config=debug");

    assert!(!init_default_tracing());
}
