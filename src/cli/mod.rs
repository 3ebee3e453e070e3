//! Argument structs for the binaries in `src/bin/`.
//!
//! Every tool is a `clap` parser implementing [`Tool`]; its binary is a
//! thin wrapper around [`main_for`], which sets up logging, runs the tool
//! and turns an error chain into `Error: ...` on stderr with exit status 1.

pub mod awksed;
pub mod columns;
pub mod molecules;
pub mod plots;
pub mod sample;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser};
use log::LevelFilter;

use crate::plot::{FigureStyle, Labels};

/// A command-line utility.
pub trait Tool: Parser {
    fn verbosity(&self) -> &Verbosity;

    fn run(self) -> anyhow::Result<()>;
}

/// Parse arguments for `T`, run it and map the outcome to an exit code.
pub fn main_for<T: Tool>() -> ExitCode {
    let tool = T::parse();
    init_logging(tool.verbosity());
    match tool.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// `-v` flags shared by every tool.
#[derive(Args, Debug, Clone, Default)]
pub struct Verbosity {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Verbosity {
    pub fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Initialise `env_logger` at the requested level; `RUST_LOG` wins.
pub fn init_logging(verbosity: &Verbosity) {
    let _ = env_logger::Builder::new()
        .filter_level(verbosity.level())
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Output path and text shared by the plotting tools.
#[derive(Args, Debug, Clone)]
pub struct FigureArgs {
    /// Image to write (.png or .svg)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Figure title
    #[arg(short, long)]
    pub title: Option<String>,

    /// X axis label
    #[arg(long, default_value = "")]
    pub xlabel: String,

    /// Y axis label
    #[arg(long, default_value = "")]
    pub ylabel: String,

    /// Use the compact publication layout
    #[arg(long)]
    pub publish: bool,

    /// Canvas size in pixels
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,
}

impl FigureArgs {
    pub fn style(&self) -> FigureStyle {
        let style = FigureStyle::from_flag(self.publish);
        match self.size {
            Some(size) => style.with_size(size),
            None => style,
        }
    }

    pub fn labels(&self) -> Labels {
        Labels {
            title: self.title.clone(),
            x: self.xlabel.clone(),
            y: self.ylabel.clone(),
        }
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let dim = |v: &str| {
        v.trim()
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("invalid dimension '{v}'"))
    };
    Ok((dim(w)?, dim(h)?))
}

/// Split a `"a;b;c"` option into its parts.
pub(crate) fn split_list(s: &str) -> Vec<String> {
    s.split(';').map(|p| p.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        let v = |verbose, quiet| Verbosity { verbose, quiet }.level();
        assert_eq!(v(0, false), LevelFilter::Warn);
        assert_eq!(v(2, false), LevelFilter::Debug);
        assert_eq!(v(9, false), LevelFilter::Trace);
        assert_eq!(v(0, true), LevelFilter::Error);
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert!(parse_size("800").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn lists() {
        assert_eq!(split_list("a; b;c"), vec!["a", "b", "c"]);
    }
}
