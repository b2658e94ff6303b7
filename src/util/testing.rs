use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{ConstituentRecord, Status};

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per process; honors RUST_LOG.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genealogy=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Shorthand row for fixtures: `person("b", Some("a"))` is b, recruited by a.
pub fn person(id: &str, referrer: Option<&str>) -> ConstituentRecord {
    let record = ConstituentRecord::new(id, id.to_uppercase(), Status::Pending);
    match referrer {
        Some(referrer) => record.referred_by(referrer),
        None => record,
    }
}
