use std::io;
use thiserror::Error;

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding a capture
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Normalized band-pass edges left the valid open interval
    #[error("normalized band edges ({low:.6}, {high:.6}) outside (0, 1)")]
    InvalidBand { low: f64, high: f64 },

    /// Normalized low-pass cutoff left the valid open interval
    #[error("normalized cutoff {0:.6} outside (0, 1)")]
    InvalidCutoff(f64),

    /// No candidate offset survived the header confirmation walk
    #[error("no synchronization header found")]
    NoSync,

    /// A decision angle fell outside every quantization bucket.
    /// This is a defect signal, never a normal outcome.
    #[error("symbol at sample {index} fell outside the decision grid (angle {angle:.4} rad)")]
    InvalidSymbol { index: usize, angle: f64 },

    /// The sync offset leaves no room for the phase reference sample
    #[error("sync offset {start} leaves no room for the phase reference")]
    ReferenceOutOfRange { start: usize },

    /// Invalid pipeline configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failed to read a capture file
    #[error("failed to read capture: {0}")]
    Io(#[from] io::Error),

    /// Malformed capture descriptor or recording
    #[error("malformed capture: {0}")]
    Descriptor(String),
}
