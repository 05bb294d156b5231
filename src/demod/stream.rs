use crate::demod::carrier;
use crate::demod::config::{DemodConfig, FrequencyBand};
use crate::demod::decision;
use crate::demod::probe::Probe;
use crate::demod::sync;
use crate::error::{DecodeError, DecodeResult};
use tracing::{info, warn};

/// One decoded subcarrier. The outcome is carried per stream so a bad
/// subcarrier never hides its neighbors' results.
#[derive(Debug)]
pub struct StreamResult {
    pub subcarrier: usize,
    pub band: FrequencyBand,
    pub symbols: DecodeResult<Vec<u8>>,
}

/// Decode every subcarrier of a capture.
///
/// Synchronization runs once, on the reference band, and the recovered
/// offset is shared: subcarriers of one capture are symbol-aligned.
/// The waveform is only ever read; each per-band phase sequence lives
/// exactly as long as its own decode.
pub fn decode_streams(
    waveform: &[f64],
    taps: &[f64],
    cfg: &DemodConfig,
    probe: &mut dyn Probe,
) -> DecodeResult<Vec<StreamResult>> {
    cfg.validate()?;
    let sps = cfg.samples_per_symbol();

    let reference = cfg.reference_band();
    let reference_phase = carrier::demod_to_phase(waveform, reference, taps, cfg)?;
    probe.phase_trace(&reference, &reference_phase);

    let candidates = sync::scan_candidates(&reference_phase, sps);
    probe.sync_candidates(&candidates);
    let best = sync::best_candidate(&candidates).ok_or(DecodeError::NoSync)?;
    info!(
        "synchronized at sample {} (score {:.3}, {} candidates)",
        best.start,
        best.error,
        candidates.len()
    );

    let mut results = Vec::with_capacity(cfg.streams);
    for index in cfg.subcarriers() {
        let band = cfg.subcarrier_band(index);
        let symbols = carrier::demod_to_phase(waveform, band, taps, cfg).and_then(|phase| {
            probe.phase_trace(&band, &phase);
            decision::to_symbols(&phase, best.start, cfg)
        });
        match &symbols {
            Ok(decoded) => info!("subcarrier {index}: {} symbols", decoded.len()),
            Err(err) => warn!("subcarrier {index}: {err}"),
        }
        let result = StreamResult {
            subcarrier: index,
            band,
            symbols,
        };
        probe.stream_decoded(&result);
        results.push(result);
    }
    Ok(results)
}
