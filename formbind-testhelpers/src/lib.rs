#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Test helpers shared by the formbind crates.
//!
//! Call [`setup`] at the start of a test to see what the decoder did: which
//! keys resolved to which fields, what each raw value converted to, and
//! which keys were skipped. Output goes through the test writer, so it only
//! shows for failing tests (or with `--nocapture`).
//!
//! The filter comes from `FORMBIND_LOG`, a
//! [`Targets`](tracing_subscriber::filter::Targets) string such as
//! `formbind::resolve=trace,formbind=debug`. Without it, the formbind crates
//! log at `TRACE` and everything else at `WARN`.

use std::sync::LazyLock;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FORMBIND_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Seconds since the first test of the process called [`setup`].
struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

/// The filter named by [`LOG_ENV`], or [`default_filter`] when it is unset
/// or does not parse.
fn log_filter() -> Targets {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(default_filter)
}

fn default_filter() -> Targets {
    Targets::new()
        .with_default(Level::WARN)
        .with_target("formbind", Level::TRACE)
}

/// Installs the process-wide subscriber the first time it is dereferenced.
///
/// Another subscriber already being installed (say, by a test binary of its
/// own) is not an error; ours is then simply not used.
static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = LazyLock::force(&START_TIME);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_timer(Uptime)
                .with_target(true)
                .with_level(true)
                .with_test_writer()
                .compact(),
        )
        .with(log_filter())
        .try_init()
        .ok();
});

/// Set up a tracing subscriber for tests.
///
/// Cheap after the first call, so every test can start with it.
pub fn setup() {
    LazyLock::force(&SUBSCRIBER_INIT);
}

/// An error type that panics when it's built (such as when you use `?`
/// to coerce to it), reporting where the `?` was.
///
/// Lets tests return `Result<(), IPanic>` and use `?` on decode results
/// while still failing with the error message.
#[derive(Debug)]
pub struct IPanic;

impl<E> From<E> for IPanic
where
    E: core::error::Error + Send + Sync,
{
    #[track_caller]
    fn from(value: E) -> Self {
        panic!("from: {}: {value}", core::panic::Location::caller())
    }
}
