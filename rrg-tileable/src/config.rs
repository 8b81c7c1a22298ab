//! Command line configuration for the graph builder.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use rrg_common::arch::ChannelWidth;
use std::path::PathBuf;

/// Configuration variables related to input/output operations
#[derive(Clone, Debug)]
pub struct IOConfig {
    /// Architecture description, in JSON
    pub input_file: PathBuf,
    /// Where to write the node-count estimate or the graph
    pub output_file: PathBuf,
}

/// Channel widths given on the command line, taking precedence over the architecture file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelWidthOverride {
    pub x: Option<u32>,
    pub y: Option<u32>,
}

impl ChannelWidthOverride {
    pub fn apply(&self, base: ChannelWidth) -> ChannelWidth {
        ChannelWidth {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub io: IOConfig,
    pub chan_width: ChannelWidthOverride,
    /// Stop after sizing the graph
    pub estimate_only: bool,
}

pub fn command() -> Command<'static> {
    Command::new("rrg-tileable")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a tileable routing resource graph with unidirectional wires")
        .arg(
            Arg::new("CHAN_WIDTH")
                .long("chan-width")
                .value_name("W")
                .takes_value(true)
                .help("Width of every routing channel"),
        )
        .arg(
            Arg::new("CHAN_WIDTH_X")
                .long("chan-width-x")
                .value_name("W")
                .takes_value(true)
                .help("Width of the X-direction channels, overrides --chan-width"),
        )
        .arg(
            Arg::new("CHAN_WIDTH_Y")
                .long("chan-width-y")
                .value_name("W")
                .takes_value(true)
                .help("Width of the Y-direction channels, overrides --chan-width"),
        )
        .arg(
            Arg::new("ESTIMATE_ONLY")
                .long("estimate-only")
                .help("Only write the number of nodes of each kind"),
        )
        .arg(
            Arg::new("ARCH")
                .help("Architecture description, as JSON")
                .index(1)
                .allow_invalid_utf8(true)
                .required(true),
        )
        .arg(
            Arg::new("OUTPUT")
                .help("Output file location")
                .index(2)
                .allow_invalid_utf8(true)
                .required(true),
        )
}

fn parse_width(matches: &ArgMatches, name: &str) -> Result<Option<u32>> {
    matches
        .value_of(name)
        .map(|v| v.parse::<u32>().with_context(|| anyhow!("Parse {} {:?}", name, v)))
        .transpose()
}

fn path_arg(matches: &ArgMatches, name: &str) -> Result<PathBuf> {
    matches
        .value_of_os(name)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing argument {}", name))
}

impl Config {
    /// Construct a configuration from the clap argument matches
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let uniform = parse_width(matches, "CHAN_WIDTH")?;
        Ok(Config {
            io: IOConfig {
                input_file: path_arg(matches, "ARCH")?,
                output_file: path_arg(matches, "OUTPUT")?,
            },
            chan_width: ChannelWidthOverride {
                x: parse_width(matches, "CHAN_WIDTH_X")?.or(uniform),
                y: parse_width(matches, "CHAN_WIDTH_Y")?.or(uniform),
            },
            estimate_only: matches.is_present("ESTIMATE_ONLY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let matches = command().try_get_matches_from(args.iter().copied())?;
        Config::from_args(&matches)
    }

    #[test]
    fn positional_paths() -> Result<()> {
        let config = parse(&["rrg-tileable", "arch.json", "graph.json"])?;

        assert_eq!(config.io.input_file, PathBuf::from("arch.json"));
        assert_eq!(config.io.output_file, PathBuf::from("graph.json"));
        assert!(!config.estimate_only);
        assert_eq!(config.chan_width, ChannelWidthOverride::default());

        Ok(())
    }

    #[test]
    fn directional_widths_win() -> Result<()> {
        let config = parse(&[
            "rrg-tileable",
            "--chan-width",
            "10",
            "--chan-width-y",
            "6",
            "--estimate-only",
            "arch.json",
            "out.json",
        ])?;

        assert!(config.estimate_only);
        assert_eq!(
            config.chan_width.apply(ChannelWidth::uniform(4)),
            ChannelWidth { x: 10, y: 6 }
        );

        Ok(())
    }

    #[test]
    fn bad_width_is_rejected() {
        assert!(parse(&["rrg-tileable", "--chan-width", "wide", "a.json", "b.json"]).is_err());
    }
}
