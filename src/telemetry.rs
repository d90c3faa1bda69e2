use tracing::info;
use trax_hal::Telemetry;

/// Telemetry sink that forwards status lines to the log.
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn report(&mut self, key: &str, value: &str) {
        info!("{}: {}", key, value);
    }
}
