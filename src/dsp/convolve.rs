use num_complex::Complex64;

/// Convolve a complex signal with real taps, keeping the output the
/// same length as the input (centered, like `numpy.convolve(.., 'same')`).
pub fn convolve_same(signal: &[Complex64], taps: &[f64]) -> Vec<Complex64> {
    let n = signal.len();
    let m = taps.len();
    if n == 0 || m == 0 {
        return signal.to_vec();
    }

    let shift = (m - 1) / 2;
    (0..n)
        .map(|i| {
            let k = i + shift;
            let lo = k.saturating_sub(m - 1);
            let hi = k.min(n - 1);
            let mut acc = Complex64::new(0.0, 0.0);
            for j in lo..=hi {
                acc += signal[j] * taps[k - j];
            }
            acc
        })
        .collect()
}
