use num_complex::Complex64;
use std::f64::consts::PI;

/// Extract the unwrapped instantaneous phase of a complex baseband
/// signal, one value per sample.
pub fn instantaneous_phase(baseband: &[Complex64]) -> Vec<f64> {
    let mut phase: Vec<f64> = baseband.iter().map(|c| c.im.atan2(c.re)).collect();
    unwrap_in_place(&mut phase);
    phase
}

/// Running phase unwrap: every time the delta between neighbors jumps
/// past +/-pi, shift that sample and everything after it by a full turn.
/// Re-applying to an already continuous sequence changes nothing.
pub fn unwrap_in_place(phase: &mut [f64]) {
    let mut prev = match phase.first() {
        Some(&p) => p,
        None => return,
    };
    let mut offset = 0.0;
    for v in phase.iter_mut().skip(1) {
        let raw = *v;
        let delta = raw - prev;
        if delta > PI {
            offset -= 2.0 * PI;
        } else if delta < -PI {
            offset += 2.0 * PI;
        }
        *v = raw + offset;
        prev = raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_removes_full_turn_jumps() {
        // a ramp that wraps at +pi, as atan2 output would
        let mut phase: Vec<f64> = (0..100)
            .map(|i| {
                let raw = i as f64 * 0.2;
                (raw + PI).rem_euclid(2.0 * PI) - PI
            })
            .collect();
        unwrap_in_place(&mut phase);
        for pair in phase.windows(2) {
            assert!((pair[1] - pair[0] - 0.2).abs() < 1e-9);
        }
    }

    #[test]
    fn unwrap_is_idempotent() {
        let mut phase: Vec<f64> = (0..200).map(|i| i as f64 * 0.3).collect();
        phase[57] += 2.0 * PI; // one artificial wrap
        unwrap_in_place(&mut phase);
        let once = phase.clone();
        unwrap_in_place(&mut phase);
        assert_eq!(phase, once);
        for pair in phase.windows(2) {
            assert!((pair[1] - pair[0]).abs() <= PI);
        }
    }

    #[test]
    fn phase_of_a_rotating_vector() {
        let baseband: Vec<Complex64> = (0..50)
            .map(|i| Complex64::from_polar(2.0, i as f64 * 0.5))
            .collect();
        let phase = instantaneous_phase(&baseband);
        for (i, p) in phase.iter().enumerate() {
            assert!((p - i as f64 * 0.5).abs() < 1e-9);
        }
    }
}
