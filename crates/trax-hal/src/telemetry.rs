//! Write-only telemetry sink.

/// Accepts key/value status lines for display. Purely informational, no
/// control impact.
pub trait Telemetry {
    /// Reports one status line.
    fn report(&mut self, key: &str, value: &str);
}

/// A telemetry sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn report(&mut self, _key: &str, _value: &str) {}
}
