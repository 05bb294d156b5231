use crate::demod::config::DemodConfig;
use crate::error::{DecodeError, DecodeResult};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// Offset of the wrap window and bucket grid from the axes. Every other
/// symbol's reference rotates by this much.
const QUADRANT_PAD: f64 = FRAC_PI_4;

/// Slice the phase sequence into symbols, one per symbol period from
/// `start`, against the reference phase taken two symbol periods
/// earlier.
///
/// An angle outside every bucket (NaN included) is a defect in the
/// configuration or the unwrap, never a valid decision, and fails hard.
pub fn to_symbols(phase: &[f64], start: usize, cfg: &DemodConfig) -> DecodeResult<Vec<u8>> {
    let sps = cfg.samples_per_symbol();
    if sps == 0 {
        return Err(DecodeError::Config("symbol period of zero samples".into()));
    }
    let zero_point = start
        .checked_sub(2 * sps)
        .and_then(|i| phase.get(i))
        .copied()
        .ok_or(DecodeError::ReferenceOutOfRange { start })?;

    let end = phase.len().min(start.saturating_add(cfg.decode_window()));
    let mut symbols = Vec::new();
    let mut rotated = false;
    let mut i = start;
    while i < end {
        let mut angle = phase[i] - zero_point;
        if rotated {
            angle -= FRAC_PI_4;
        }
        rotated = !rotated;
        angle = -angle;
        while angle < -PI + QUADRANT_PAD {
            angle += 2.0 * PI;
        }
        while angle > PI + QUADRANT_PAD {
            angle -= 2.0 * PI;
        }

        let symbol = if angle < -FRAC_PI_2 + QUADRANT_PAD {
            3
        } else if angle < QUADRANT_PAD {
            0
        } else if angle < FRAC_PI_2 + QUADRANT_PAD {
            1
        } else if angle < PI + QUADRANT_PAD {
            2
        } else {
            return Err(DecodeError::InvalidSymbol { index: i, angle });
        };
        symbols.push(symbol);
        i += sps;
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DemodConfig {
        DemodConfig::new(350.0, 300.0, 3)
    }

    /// Plateau phases that should decode to `symbols`, preceded by two
    /// symbol periods holding the reference phase.
    fn phase_for(symbols: &[u8], sps: usize, zero_point: f64) -> Vec<f64> {
        let mut phase = vec![zero_point; 2 * sps];
        for (k, &s) in symbols.iter().enumerate() {
            let rotation = if k % 2 == 1 { FRAC_PI_4 } else { 0.0 };
            let value = zero_point + rotation - s as f64 * FRAC_PI_2;
            phase.extend(std::iter::repeat(value).take(sps));
        }
        phase
    }

    #[test]
    fn known_plateaus_decode_exactly() {
        let cfg = test_config();
        let sps = cfg.samples_per_symbol();
        let expected = [1u8, 2, 0, 3, 1, 0, 2, 3];
        let phase = phase_for(&expected, sps, 0.8);
        let symbols = to_symbols(&phase, 2 * sps, &cfg).unwrap();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn wrapped_angles_still_land_in_their_buckets() {
        let cfg = test_config();
        let sps = cfg.samples_per_symbol();
        let expected = [3u8, 3, 2, 1, 3];
        let mut phase = phase_for(&expected, sps, -0.4);
        // shift whole turns in, as an unwrapped trace legitimately has
        for v in phase.iter_mut().skip(4 * sps) {
            *v += 4.0 * PI;
        }
        let symbols = to_symbols(&phase, 2 * sps, &cfg).unwrap();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn corrupt_phase_fails_loudly() {
        let cfg = test_config();
        let sps = cfg.samples_per_symbol();
        let mut phase = phase_for(&[1, 2, 0], sps, 0.0);
        phase[2 * sps + sps] = f64::NAN;
        let result = to_symbols(&phase, 2 * sps, &cfg);
        assert!(matches!(result, Err(DecodeError::InvalidSymbol { .. })));
    }

    #[test]
    fn start_without_room_for_the_reference_is_refused() {
        let cfg = test_config();
        let phase = vec![0.0; 4000];
        let result = to_symbols(&phase, 100, &cfg);
        assert!(matches!(result, Err(DecodeError::ReferenceOutOfRange { .. })));
    }
}
