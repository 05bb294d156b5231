//! IIR filtering primitives for the demodulation pipeline.
//!
//! Eighth-order Butterworth designs run as a cascade of biquad sections
//! for numerical stability. All entry points are pure: a fresh filter
//! state is built per call and discarded with it.

use crate::error::{DecodeError, DecodeResult};
use num_complex::Complex64;
use std::f64::consts::PI;

const ORDER: usize = 8;

/// Cutoff the low-pass defaults to when a caller has no opinion (Hz,
/// against the reference length).
pub const DEFAULT_LOWPASS_CUTOFF: f64 = 15.0;

/// Samples averaged per point of the AGC level estimate.
const AGC_WINDOW: usize = 100;

#[derive(Clone, Copy)]
enum Response {
    Lowpass,
    Highpass,
}

/// One second-order section. Coefficients only; state lives with the
/// run that uses it.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    /// Numerator [b0, b1, b2]
    b: [f64; 3],
    /// Denominator [a1, a2], a0 normalized to 1
    a: [f64; 2],
}

impl Biquad {
    /// Poles inside the unit circle?
    pub fn is_stable(&self) -> bool {
        self.a[1].abs() < 1.0 && self.a[0].abs() < 1.0 + self.a[1]
    }

    /// Direct Form II Transposed over a complex block.
    fn run(&self, samples: &mut [Complex64]) {
        let mut s0 = Complex64::new(0.0, 0.0);
        let mut s1 = Complex64::new(0.0, 0.0);
        for v in samples.iter_mut() {
            let x = *v;
            let y = self.b[0] * x + s0;
            s0 = self.b[1] * x - self.a[0] * y + s1;
            s1 = self.b[2] * x - self.a[1] * y;
            *v = y;
        }
    }

    fn run_real(&self, samples: &mut [f64]) {
        let mut s0 = 0.0;
        let mut s1 = 0.0;
        for v in samples.iter_mut() {
            let x = *v;
            let y = self.b[0] * x + s0;
            s0 = self.b[1] * x - self.a[0] * y + s1;
            s1 = self.b[2] * x - self.a[1] * y;
            *v = y;
        }
    }
}

/// Band-pass `samples` to the window `[low_hz, high_hz]`, normalized as
/// `2·f/sample_rate`. Output amplitude is doubled to compensate the
/// passband attenuation of the cascade.
pub fn bandpass(
    samples: &[f64],
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
) -> DecodeResult<Vec<f64>> {
    let low = 2.0 * low_hz / sample_rate;
    let high = 2.0 * high_hz / sample_rate;
    if !(low > 0.0 && low < high && high < 1.0) {
        return Err(DecodeError::InvalidBand { low, high });
    }

    let mut sections = butterworth_sections(ORDER, high, Response::Lowpass);
    sections.extend(butterworth_sections(ORDER, low, Response::Highpass));

    let mut out = samples.to_vec();
    for section in &sections {
        section.run_real(&mut out);
    }
    for v in &mut out {
        *v *= 2.0;
    }
    Ok(out)
}

/// Low-pass with the cutoff expressed against a reference total length
/// rather than the sample rate: the normalized cutoff is
/// `2·cutoff/reference_len`.
pub fn lowpass(samples: &[f64], reference_len: usize, cutoff: f64) -> DecodeResult<Vec<f64>> {
    let sections = lowpass_sections(reference_len, cutoff)?;
    let mut out = samples.to_vec();
    for section in &sections {
        section.run_real(&mut out);
    }
    Ok(out)
}

/// Complex-sample variant of [`lowpass`], for baseband I/Q.
pub fn lowpass_complex(
    samples: &[Complex64],
    reference_len: usize,
    cutoff: f64,
) -> DecodeResult<Vec<Complex64>> {
    let sections = lowpass_sections(reference_len, cutoff)?;
    let mut out = samples.to_vec();
    for section in &sections {
        section.run(&mut out);
    }
    Ok(out)
}

fn lowpass_sections(reference_len: usize, cutoff: f64) -> DecodeResult<Vec<Biquad>> {
    let wn = 2.0 * cutoff / reference_len as f64;
    if !(wn > 0.0 && wn < 1.0) {
        return Err(DecodeError::InvalidCutoff(wn));
    }
    Ok(butterworth_sections(ORDER, wn, Response::Lowpass))
}

/// Normalize the signal level with a moving average of itself. Stretches
/// where the level estimate is exactly zero divide by one instead.
pub fn agc(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    let mut prefix = Vec::with_capacity(n + 1);
    let mut running = 0.0;
    prefix.push(running);
    for &v in samples {
        running += v;
        prefix.push(running);
    }

    // centered window matching a same-length convolution with ones
    let ahead = AGC_WINDOW / 2;
    let behind = AGC_WINDOW - ahead;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(behind);
            let hi = (i + ahead).min(n);
            let mut level = (prefix[hi] - prefix[lo]) / AGC_WINDOW as f64;
            if level == 0.0 {
                level = 1.0;
            }
            samples[i] / level
        })
        .collect()
}

/// Analog prototype poles on the s-plane unit circle.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Design a Butterworth cascade for a cutoff normalized to Nyquist.
fn butterworth_sections(order: usize, wn: f64, response: Response) -> Vec<Biquad> {
    // design at fs = 2 so the Nyquist frequency is 1
    let fs = 2.0;
    let wc = 2.0 * fs * (PI * wn / fs).tan();
    let k = 2.0 * fs;

    let poles = butterworth_poles(order);
    let mut sections = Vec::with_capacity(order.div_ceil(2));
    let mut i = 0;
    while i < poles.len() {
        if poles[i].im.abs() < 1e-10 {
            sections.push(bilinear_single(poles[i].re * wc, k, response));
            i += 1;
        } else {
            sections.push(bilinear_pair(poles[i] * wc, k, response));
            i += 2; // conjugate handled together
        }
    }
    sections
}

/// Bilinear transform of a single real pole.
fn bilinear_single(p: f64, k: f64, response: Response) -> Biquad {
    let alpha = k - p;
    let beta = k + p;
    match response {
        Response::Lowpass => Biquad {
            b: [-p / alpha, -p / alpha, 0.0],
            a: [-beta / alpha, 0.0],
        },
        Response::Highpass => Biquad {
            b: [k / alpha, -k / alpha, 0.0],
            a: [-beta / alpha, 0.0],
        },
    }
}

/// Bilinear transform of a complex conjugate pole pair.
fn bilinear_pair(p: Complex64, k: f64, response: Response) -> Biquad {
    let mag_sq = p.re * p.re + p.im * p.im;
    let k2 = k * k;
    let d = k2 - 2.0 * k * p.re + mag_sq;
    let a = [2.0 * (mag_sq - k2) / d, (k2 + 2.0 * k * p.re + mag_sq) / d];
    match response {
        Response::Lowpass => Biquad {
            b: [mag_sq / d, 2.0 * mag_sq / d, mag_sq / d],
            a,
        },
        Response::Highpass => Biquad {
            b: [k2 / d, -2.0 * k2 / d, k2 / d],
            a,
        },
    }
}
