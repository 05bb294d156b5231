/// Capture sample rate (Hz)
pub const SAMPLE_RATE: f64 = 44100.0;

/// Seconds of payload decoded after the header
pub const DECODE_SECONDS: f64 = 2.5;

/// Half-bandwidth of a subcarrier band (Hz)
pub const GUARD_HZ: f64 = 80.0;

/// Subcarriers decoded when the capture does not say
pub const DEFAULT_STREAMS: usize = 3;

/// Log level (overridable via RUST_LOG)
pub const LOG_LEVEL: &str = "info";
