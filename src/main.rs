use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use phasetap_rs::capture::CaptureDescriptor;
use phasetap_rs::demod::{Probe, StreamResult, SyncCandidate, decode_streams};
use phasetap_rs::error::DecodeResult;
use phasetap_rs::utils::logging::init_logging;
use phasetap_rs::utils::reference::{BlumBlumShub, DEFAULT_MODULUS};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "phasetap", about = "Decode QPSK subcarriers from an audio capture")]
struct Args {
    /// Capture descriptor (JSON)
    capture: PathBuf,

    /// Replace the descriptor's waveform with a mono 16-bit WAV recording
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Number of subcarriers to decode (overrides the descriptor)
    #[arg(long)]
    streams: Option<usize>,
}

/// Feeds the pipeline's observation hooks into a progress bar.
struct DecodeProgress {
    bar: ProgressBar,
}

impl DecodeProgress {
    fn new(streams: usize) -> Self {
        let bar = ProgressBar::new(streams as u64 + 1);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        bar.set_message("synchronizing");
        Self { bar }
    }
}

impl Probe for DecodeProgress {
    fn sync_candidates(&mut self, _candidates: &[SyncCandidate]) {
        self.bar.inc(1);
        self.bar.set_message("decoding");
    }

    fn stream_decoded(&mut self, result: &StreamResult) {
        self.bar.inc(1);
        self.bar
            .set_message(format!("subcarrier {}", result.subcarrier));
    }
}

fn main() {
    init_logging();
    if let Err(err) = run(Args::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> DecodeResult<()> {
    let mut capture = CaptureDescriptor::from_json_file(&args.capture)?;
    if let Some(path) = &args.wav {
        capture.load_wav_samples(path)?;
    }
    if let Some(streams) = args.streams {
        capture.streams = Some(streams);
    }
    let cfg = capture.config()?;
    info!(
        "decoding {} subcarriers, base {:.1} Hz, {} baud",
        cfg.streams, cfg.base_freq, cfg.baud
    );

    let mut progress = DecodeProgress::new(cfg.streams);
    let results = decode_streams(&capture.samples, &capture.matched_filter, &cfg, &mut progress)?;
    progress.bar.finish_and_clear();

    let expected = capture.reference_seed.map(|seed| {
        let modulus = capture.reference_modulus.unwrap_or(DEFAULT_MODULUS);
        let count = (cfg.baud * cfg.decode_seconds) as usize;
        BlumBlumShub::new(seed, modulus)
            .map(|v| (v % 4) as u8)
            .take(count)
            .collect::<Vec<u8>>()
    });

    for result in &results {
        match &result.symbols {
            Ok(symbols) => {
                info!(
                    "subcarrier {} ({:.0}-{:.0} Hz): {:?}",
                    result.subcarrier, result.band.low, result.band.high, symbols
                );
                if let Some(expected) = &expected {
                    let n = symbols.len().min(expected.len());
                    let mismatches = symbols[..n]
                        .iter()
                        .zip(&expected[..n])
                        .filter(|(a, b)| a != b)
                        .count();
                    info!(
                        "subcarrier {}: {mismatches} mismatches against the reference over {n} symbols",
                        result.subcarrier
                    );
                }
            }
            Err(err) => warn!("subcarrier {} failed: {err}", result.subcarrier),
        }
    }
    Ok(())
}
