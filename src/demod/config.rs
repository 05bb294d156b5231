use crate::error::{DecodeError, DecodeResult};
use crate::utils::consts::{DECODE_SECONDS, GUARD_HZ, SAMPLE_RATE};
use std::ops::Range;

/// Lowest subcarrier index carrying data
pub const FIRST_SUBCARRIER: usize = 2;

/// Subcarrier whose band the synchronization search runs on
pub const REFERENCE_SUBCARRIER: usize = 4;

/// A band-pass window around one subcarrier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyBand {
    pub low: f64,
    pub high: f64,
}

impl FrequencyBand {
    pub fn center(&self) -> f64 {
        0.5 * (self.low + self.high)
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Immutable per-capture configuration, threaded through every stage.
#[derive(Clone, Debug)]
pub struct DemodConfig {
    pub sample_rate: f64,
    pub baud: f64,
    pub base_freq: f64,
    pub streams: usize,
    pub decode_seconds: f64,
    pub guard_hz: f64,
}

impl DemodConfig {
    pub fn new(base_freq: f64, baud: f64, streams: usize) -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            baud,
            base_freq,
            streams,
            decode_seconds: DECODE_SECONDS,
            guard_hz: GUARD_HZ,
        }
    }

    pub fn validate(&self) -> DecodeResult<()> {
        if !(self.baud > 0.0) {
            return Err(DecodeError::Config(format!("baud {} must be positive", self.baud)));
        }
        if !(self.base_freq > 0.0) {
            return Err(DecodeError::Config(format!(
                "base frequency {} must be positive",
                self.base_freq
            )));
        }
        if self.streams == 0 {
            return Err(DecodeError::Config("stream count must be at least 1".into()));
        }
        if self.samples_per_symbol() < 2 {
            return Err(DecodeError::Config(format!(
                "baud {} leaves fewer than 2 samples per symbol at {} Hz",
                self.baud, self.sample_rate
            )));
        }
        Ok(())
    }

    /// Samples per symbol period (integer division, as the symbol clock
    /// recovery steps whole samples).
    pub fn samples_per_symbol(&self) -> usize {
        (self.sample_rate / self.baud) as usize
    }

    /// Samples decoded after the sync offset.
    pub fn decode_window(&self) -> usize {
        (self.sample_rate * self.decode_seconds) as usize
    }

    pub fn subcarrier_band(&self, index: usize) -> FrequencyBand {
        let center = self.base_freq * index as f64;
        FrequencyBand {
            low: center - self.guard_hz,
            high: center + self.guard_hz,
        }
    }

    pub fn reference_band(&self) -> FrequencyBand {
        self.subcarrier_band(REFERENCE_SUBCARRIER)
    }

    /// Subcarrier indices decoded by the orchestrator.
    pub fn subcarriers(&self) -> Range<usize> {
        FIRST_SUBCARRIER..FIRST_SUBCARRIER + self.streams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_per_symbol_follows_baud() {
        let cfg = DemodConfig::new(350.0, 300.0, 3);
        assert_eq!(cfg.samples_per_symbol(), 147);

        // doubling the baud halves the symbol period, integer division
        let fast = DemodConfig::new(350.0, 600.0, 3);
        assert_eq!(fast.samples_per_symbol(), 73);
    }

    #[test]
    fn subcarrier_bands_sit_around_multiples_of_base() {
        let cfg = DemodConfig::new(350.0, 300.0, 3);
        let band = cfg.subcarrier_band(2);
        assert_eq!(band.center(), 700.0);
        assert_eq!(band.width(), 160.0);
        assert_eq!(cfg.reference_band().center(), 1400.0);
        assert_eq!(cfg.subcarriers(), 2..5);
    }

    #[test]
    fn validation_rejects_degenerate_parameters() {
        assert!(DemodConfig::new(350.0, 0.0, 3).validate().is_err());
        assert!(DemodConfig::new(0.0, 300.0, 3).validate().is_err());
        assert!(DemodConfig::new(350.0, 300.0, 0).validate().is_err());
        assert!(DemodConfig::new(350.0, 30000.0, 3).validate().is_err());
        assert!(DemodConfig::new(350.0, 300.0, 3).validate().is_ok());
    }
}
