use crate::demod::config::FrequencyBand;
use crate::demod::stream::StreamResult;
use crate::demod::sync::SyncCandidate;

/// Observation hooks for the pipeline. The algorithms themselves never
/// draw or print; anything that wants to watch intermediate sequences
/// implements this and taps in.
pub trait Probe {
    /// The unwrapped phase recovered for one band.
    fn phase_trace(&mut self, _band: &FrequencyBand, _phase: &[f64]) {}

    /// Every confirmed header candidate, in offset order.
    fn sync_candidates(&mut self, _candidates: &[SyncCandidate]) {}

    /// One subcarrier finished, successfully or not.
    fn stream_decoded(&mut self, _result: &StreamResult) {}
}

/// Observer that ignores everything.
pub struct NoProbe;

impl Probe for NoProbe {}
