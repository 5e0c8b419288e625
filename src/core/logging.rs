use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs compact console logging. `RUST_LOG` wins over the verbosity count.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let format = tracing_subscriber::fmt::format().compact();
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .try_init();
}

/// Receives wall-clock samples taken around export and render stages.
pub trait Telemetry {
    fn record(&mut self, label: &str, elapsed: Duration);
}

/// Emits every sample as an info event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn record(&mut self, label: &str, elapsed: Duration) {
        info!(stage = label, "done in {:.3} seconds", elapsed.as_secs_f64());
    }
}

/// Keeps samples in memory, for callers that report timings themselves.
#[derive(Debug, Default, Clone)]
pub struct RecordingTelemetry {
    pub samples: Vec<(String, Duration)>,
}

impl Telemetry for RecordingTelemetry {
    fn record(&mut self, label: &str, elapsed: Duration) {
        self.samples.push((label.to_string(), elapsed));
    }
}

/// Runs `f` and reports its duration under `label`.
pub fn timed<T>(telemetry: &mut dyn Telemetry, label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    telemetry.record(label, start.elapsed());
    out
}
