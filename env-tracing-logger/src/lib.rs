//! Process-wide `tracing` subscriber setup, shared by the binary and by
//! any test harness that wants readable log output.

use tracing_subscriber::{
    fmt::{self, format, time},
    prelude::*,
    EnvFilter,
};

struct Guard {}

impl Drop for Guard {
    fn drop(&mut self) {}
}

/// Install the global `tracing` subscriber. Panics if a subscriber is
/// already installed.
pub fn init() -> impl Drop {
    init_result()
        .map_err(|e| e.1)
        .expect("could not set global default tracing subscriber")
}

fn init_result() -> Result<impl Drop, (impl Drop, tracing::subscriber::SetGlobalDefaultError)> {
    let evt_fmt = format().with_timer(time::Uptime::default()).compact();
    let fmt_layer = fmt::layer().event_format(evt_fmt);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_default_env())
        .init();

    let guard = Guard {};

    Ok::<_, (Guard, tracing::subscriber::SetGlobalDefaultError)>(guard)
}
