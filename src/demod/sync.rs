use crossbeam_channel::unbounded;
use std::f64::consts::FRAC_PI_4;
use std::thread;
use tracing::debug;

/// Symbols in the alternating synchronization header
pub const HEADER_SYMBOLS: usize = 6;

/// Confirmation threshold for the middle-sample and quarter-turn tests
const CONFIRM_CUTOFF: f64 = 0.45;

/// Confirmations after which the threshold halves
const TIGHTEN_AFTER: usize = 4;

/// Weak preference for earlier offsets, a tie-break rather than a cost
const START_BIAS: f64 = 0.002;

/// Candidate spans below this run on the calling thread
const MIN_PARALLEL_SPAN: usize = 4096;

/// A confirmed header location: the first post-header decision sample
/// and the accumulated confirmation error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncCandidate {
    pub start: usize,
    pub error: f64,
}

/// Locate the header in a phase sequence, returning the best-scoring
/// candidate or `None` when nothing confirms.
pub fn find_sync_offset(phase: &[f64], samples_per_symbol: usize) -> Option<SyncCandidate> {
    best_candidate(&scan_candidates(phase, samples_per_symbol))
}

/// The minimum-error candidate; earlier offsets win exact ties.
pub fn best_candidate(candidates: &[SyncCandidate]) -> Option<SyncCandidate> {
    candidates
        .iter()
        .copied()
        .reduce(|best, c| if c.error < best.error { c } else { best })
}

/// Exhaustively score every candidate start offset. Offsets are
/// independent of each other, so the scan is chunked across worker
/// threads and the per-chunk results stitched back in offset order.
pub fn scan_candidates(phase: &[f64], samples_per_symbol: usize) -> Vec<SyncCandidate> {
    let half = samples_per_symbol / 2;
    if half == 0 || phase.len() < samples_per_symbol {
        return Vec::new();
    }
    let lo = half;
    let hi = phase.len() - half;
    if lo >= hi {
        return Vec::new();
    }

    let span = hi - lo;
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(span.div_ceil(MIN_PARALLEL_SPAN));
    if workers <= 1 {
        return scan_range(phase, samples_per_symbol, lo, hi);
    }

    let chunk = span.div_ceil(workers);
    let (tx, rx) = unbounded();
    thread::scope(|scope| {
        for w in 0..workers {
            let tx = tx.clone();
            let chunk_lo = lo + w * chunk;
            let chunk_hi = hi.min(chunk_lo + chunk);
            if chunk_lo >= chunk_hi {
                continue;
            }
            scope.spawn(move || {
                let found = scan_range(phase, samples_per_symbol, chunk_lo, chunk_hi);
                let _ = tx.send((chunk_lo, found));
            });
        }
    });
    drop(tx);

    let mut parts: Vec<(usize, Vec<SyncCandidate>)> = rx.into_iter().collect();
    parts.sort_by_key(|(offset, _)| *offset);
    let candidates: Vec<SyncCandidate> = parts.into_iter().flat_map(|(_, found)| found).collect();
    debug!(
        "scanned {} offsets across {} workers, {} candidates confirmed",
        span,
        workers,
        candidates.len()
    );
    candidates
}

fn scan_range(phase: &[f64], samples_per_symbol: usize, lo: usize, hi: usize) -> Vec<SyncCandidate> {
    let mut found = Vec::new();
    for i in lo..hi {
        let (count, mut error) = confirm_walk(phase, samples_per_symbol, i);
        error += START_BIAS * (i as f64).sqrt();
        if count == HEADER_SYMBOLS {
            // the first decision sample sits four and a half symbol
            // periods past the walk origin
            found.push(SyncCandidate {
                start: i + 9 * samples_per_symbol / 2,
                error,
            });
        }
    }
    found
}

/// Walk forward from `start` one symbol period at a time, confirming
/// while each boundary shows a quarter-turn step of alternating sign
/// with the boundary sample near the midpoint. Later confirmations
/// weigh quadratically, so a sloppy tail costs more than a sloppy head.
fn confirm_walk(phase: &[f64], samples_per_symbol: usize, start: usize) -> (usize, f64) {
    let half = samples_per_symbol / 2;
    let mut t = start;
    let mut count = 0usize;
    let mut error = 0.0;
    let mut prev_sign = false;

    while t + half < phase.len() {
        let left = phase[t - half];
        let right = phase[t + half];
        let mid_err = (phase[t] - 0.5 * (left + right)).powi(2);
        let quarter_err = ((left - right).abs() - FRAC_PI_4).powi(2);
        let sign = left > right;
        let cutoff = if count >= TIGHTEN_AFTER {
            CONFIRM_CUTOFF / 2.0
        } else {
            CONFIRM_CUTOFF
        };

        if mid_err < cutoff && quarter_err < cutoff && sign != prev_sign {
            t += samples_per_symbol;
            count += 1;
            let weight = (count * count) as f64;
            error += mid_err * weight + quarter_err * weight;
            prev_sign = sign;
            if count > HEADER_SYMBOLS {
                // a longer run can never be accepted
                break;
            }
        } else {
            break;
        }
    }
    (count, error)
}
