use crate::demod::config::DemodConfig;
use crate::error::{DecodeError, DecodeResult};
use crate::utils::consts::{DEFAULT_STREAMS, SAMPLE_RATE};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// PCM full-scale used when a recording arrives as 16-bit samples
pub const PCM_SCALING: f64 = 32000.0;

/// Everything the decoder needs to know about one capture.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureDescriptor {
    /// Recorded waveform at 44.1 kHz. May be empty when a WAV recording
    /// is supplied alongside the descriptor.
    #[serde(default)]
    pub samples: Vec<f64>,

    /// Matched-filter convolution taps
    pub matched_filter: Vec<f64>,

    /// Carrier base; subcarrier i sits at `base_frequency * i`
    pub base_frequency: f64,

    /// Symbols per second
    pub baud: f64,

    /// Subcarriers to decode
    #[serde(default)]
    pub streams: Option<usize>,

    /// Seed of the transmitter's comparison sequence, when known
    #[serde(default)]
    pub reference_seed: Option<u64>,

    /// Modulus of the comparison sequence generator
    #[serde(default)]
    pub reference_modulus: Option<u64>,
}

impl CaptureDescriptor {
    pub fn from_json_file(path: &Path) -> DecodeResult<Self> {
        let raw = fs::read_to_string(path)?;
        let descriptor: Self =
            serde_json::from_str(&raw).map_err(|e| DecodeError::Descriptor(e.to_string()))?;
        info!(
            "capture: {} samples, {} taps, base {:.1} Hz, {} baud",
            descriptor.samples.len(),
            descriptor.matched_filter.len(),
            descriptor.base_frequency,
            descriptor.baud
        );
        Ok(descriptor)
    }

    /// Replace the waveform with a mono 16-bit WAV recording.
    pub fn load_wav_samples(&mut self, path: &Path) -> DecodeResult<()> {
        let mut reader =
            hound::WavReader::open(path).map_err(|e| DecodeError::Descriptor(e.to_string()))?;
        let spec = reader.spec();
        if spec.channels != 1 {
            return Err(DecodeError::Descriptor(format!(
                "expected a mono recording, got {} channels",
                spec.channels
            )));
        }
        if spec.sample_rate as f64 != SAMPLE_RATE {
            return Err(DecodeError::Descriptor(format!(
                "expected a {} Hz recording, got {} Hz",
                SAMPLE_RATE, spec.sample_rate
            )));
        }
        self.samples = reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f64 / PCM_SCALING))
            .collect::<Result<_, _>>()
            .map_err(|e| DecodeError::Descriptor(e.to_string()))?;
        info!("loaded {} samples from {}", self.samples.len(), path.display());
        Ok(())
    }

    /// Build the validated pipeline configuration for this capture.
    pub fn config(&self) -> DecodeResult<DemodConfig> {
        if self.matched_filter.is_empty() {
            return Err(DecodeError::Descriptor(
                "capture has no matched filter taps".into(),
            ));
        }
        let cfg = DemodConfig::new(
            self.base_frequency,
            self.baud,
            self.streams.unwrap_or(DEFAULT_STREAMS),
        );
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_with_defaults() {
        let descriptor: CaptureDescriptor = serde_json::from_str(
            r#"{
                "samples": [0.0, 0.25, -0.25],
                "matched_filter": [0.2, 1.0, 0.2],
                "base_frequency": 350.0,
                "baud": 300.0
            }"#,
        )
        .unwrap();
        assert_eq!(descriptor.samples.len(), 3);
        assert_eq!(descriptor.streams, None);
        assert_eq!(descriptor.reference_seed, None);

        let cfg = descriptor.config().unwrap();
        assert_eq!(cfg.streams, DEFAULT_STREAMS);
        assert_eq!(cfg.samples_per_symbol(), 147);
    }

    #[test]
    fn empty_taps_are_refused() {
        let descriptor: CaptureDescriptor = serde_json::from_str(
            r#"{
                "matched_filter": [],
                "base_frequency": 350.0,
                "baud": 300.0
            }"#,
        )
        .unwrap();
        assert!(matches!(
            descriptor.config(),
            Err(DecodeError::Descriptor(_))
        ));
    }
}
