use crate::demod::config::{DemodConfig, FrequencyBand};
use crate::dsp::{convolve, filter, phase};
use crate::error::{DecodeError, DecodeResult};
use num_complex::Complex64;
use std::f64::consts::PI;
use tracing::debug;

/// Cutoff (Hz, against the waveform length) of the post-mix low-pass
const BASEBAND_CUTOFF: f64 = 100.0;

/// Mix one subcarrier band down to baseband and return its unwrapped
/// instantaneous phase, one value per input sample.
///
/// The local oscillator time base spans the capture duration inclusive
/// of the endpoint, matching the transmitter's sampling of the carrier.
pub fn demod_to_phase(
    waveform: &[f64],
    band: FrequencyBand,
    taps: &[f64],
    cfg: &DemodConfig,
) -> DecodeResult<Vec<f64>> {
    let n = waveform.len();
    if n < 2 {
        return Err(DecodeError::Config(format!(
            "waveform of {n} samples is too short to demodulate"
        )));
    }

    let frequency = band.center();
    let filtered = filter::bandpass(waveform, band.low, band.high, cfg.sample_rate)?;

    let seconds = n as f64 / cfg.sample_rate;
    let mut mixed = Vec::with_capacity(n);
    for (i, &sample) in filtered.iter().enumerate() {
        let t = i as f64 * seconds / (n - 1) as f64;
        let angle = 2.0 * PI * frequency * t;
        mixed.push(Complex64::new(angle.cos(), angle.sin()) * sample);
    }

    let baseband = filter::lowpass_complex(&mixed, n, BASEBAND_CUTOFF)?;
    let shaped = convolve::convolve_same(&baseband, taps);
    debug!(
        "demodulated {} samples around {:.1} Hz ({} matched filter taps)",
        n,
        frequency,
        taps.len()
    );
    Ok(phase::instantaneous_phase(&shaped))
}
