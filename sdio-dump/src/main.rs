//! Capture dump harness
//!
//! Stands in for the host analyzer framework during development: loads a
//! JSON capture produced by the upstream decoder and either prints the most
//! detailed annotation per frame or writes the CSV export.
//!
//! # Usage
//!
//! ```text
//! sdio-dump <capture.json>                  # annotate to stdout
//! sdio-dump <capture.json> --csv out.csv    # write the export file
//! sdio-dump <capture.json> --base bin       # hex (default), dec, bin, ascii
//! ```
//!
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=sdio_protocol=debug`).

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sdio_protocol::{export_csv, Annotator, Capture, DisplayBase};
use tracing::info;

struct Args {
    capture: PathBuf,
    csv: Option<PathBuf>,
    base: DisplayBase,
}

fn parse_base(name: &str) -> Result<DisplayBase> {
    match name {
        "hex" => Ok(DisplayBase::Hex),
        "dec" => Ok(DisplayBase::Decimal),
        "bin" => Ok(DisplayBase::Binary),
        "ascii" => Ok(DisplayBase::Ascii),
        other => bail!("unknown display base '{other}' (expected hex, dec, bin, or ascii)"),
    }
}

fn parse_args() -> Result<Args> {
    let mut capture = None;
    let mut csv = None;
    let mut base = DisplayBase::Hex;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--csv" {
            let path = args.next().context("--csv needs a file path")?;
            csv = Some(PathBuf::from(path));
        } else if arg == "--base" {
            let name = args.next().context("--base needs a value")?;
            base = parse_base(&name)?;
        } else if capture.is_none() {
            capture = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument '{arg}'");
        }
    }

    let Some(capture) = capture else {
        bail!("usage: sdio-dump <capture.json> [--csv <out.csv>] [--base hex|dec|bin|ascii]");
    };

    Ok(Args { capture, csv, base })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args()?;

    let file = File::open(&args.capture)
        .with_context(|| format!("opening capture file {}", args.capture.display()))?;
    let capture: Capture = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing capture file {}", args.capture.display()))?;
    info!(
        frames = capture.frames.len(),
        sample_rate = capture.sample_rate,
        "capture loaded"
    );

    match &args.csv {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("creating export file {}", path.display()))?;
            let mut sink = BufWriter::new(out);
            // the CLI has no progress UI, so the export never cancels
            export_csv(&capture, &mut sink, args.base, |_, _| false)?;
            info!(path = %path.display(), "export written");
        }
        None => {
            let mut annotator = Annotator::new();
            for (index, frame) in capture.frames.iter().enumerate() {
                let strings = annotator.annotate(frame, args.base);
                let text = strings.last().map(String::as_str).unwrap_or("");
                println!("{index:6}  {text}");
            }
        }
    }

    Ok(())
}
