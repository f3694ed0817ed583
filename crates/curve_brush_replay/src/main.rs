// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve brush replay - headless host for the curve brush engine
//!
//! Loads a RON replay script (brush settings, view, curves, UI regions and
//! timed input actions), feeds it through a stroke controller on a scripted
//! clock and writes the resulting curves.
//!
//! ```text
//! curve-brush-replay <script.ron> [output.ron|output.json]
//! ```
//!
//! Without an output path the result is printed to stdout as RON. Logging
//! follows `RUST_LOG`.

mod error;
mod runner;
mod script;

use error::{ReplayError, Result};
use script::ReplayScript;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "curve_brush_core=debug,curve_brush_replay=info";

/// Command line arguments
#[derive(Debug, PartialEq)]
struct Args {
    script: PathBuf,
    output: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        let script = args.next().ok_or(ReplayError::Usage)?;
        let output = args.next();
        if args.next().is_some() {
            return Err(ReplayError::Usage);
        }
        Ok(Self {
            script: PathBuf::from(script),
            output: output.map(PathBuf::from),
        })
    }
}

fn main() {
    // Initialize logging; RUST_LOG replaces the default filter
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting curve brush replay v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_cli(std::env::args().skip(1)) {
        tracing::error!("Replay failed: {e}");
        std::process::exit(1);
    }
}

fn run_cli(args: impl IntoIterator<Item = String>) -> Result<()> {
    let args = Args::parse(args)?;
    let script = ReplayScript::load(&args.script)?;
    let output = runner::run(&script)?;
    output.write(args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            args(&["stroke.ron"]).unwrap(),
            Args {
                script: PathBuf::from("stroke.ron"),
                output: None,
            }
        );
        assert_eq!(
            args(&["stroke.ron", "out.json"]).unwrap().output,
            Some(PathBuf::from("out.json"))
        );
        assert!(matches!(args(&[]), Err(ReplayError::Usage)));
        assert!(matches!(args(&["a", "b", "c"]), Err(ReplayError::Usage)));
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(DEFAULT_LOG_FILTER
            .split(',')
            .all(|d| d.parse::<tracing_subscriber::filter::Directive>().is_ok()));
    }

    #[test]
    fn test_demo_script_runs() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/flatten_peak.ron");
        let script = ReplayScript::load(std::path::Path::new(path)).unwrap();
        let output = runner::run(&script).unwrap();
        assert_eq!(output.summary.strokes, 1);
        assert!(output.summary.samples > 0);
    }
}
