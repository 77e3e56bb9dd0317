use std::{io::IsTerminal, path::PathBuf};

use clap::{Parser, ValueEnum};

use crate::get_version;

/// Writes newline-delimited `[time, record]` JSON to Amazon Timestream.
#[derive(Parser, Debug)]
#[command(rename_all = "kebab-case", version = get_version(), about)]
pub struct Opts {
    /// Read configuration from this file. The format is detected from the file extension.
    #[arg(short, long, env = "TIMESTREAM_SINK_CONFIG")]
    pub config: PathBuf,

    /// Read input from this file instead of stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Enable more detailed internal logging. Repeat to increase level. Overridden by `-q`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reduce detail of internal logging. Repeat to reduce further. Overrides `-v`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Set the logging format.
    #[arg(long, default_value = "text", env = "TIMESTREAM_SINK_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Control when ANSI terminal formatting is used.
    #[arg(long, default_value = "auto", env = "TIMESTREAM_SINK_COLOR")]
    pub color: Color,

    /// Exit on startup if the healthcheck fails.
    #[arg(short, long, env = "TIMESTREAM_SINK_REQUIRE_HEALTHY")]
    pub require_healthy: bool,

    /// Map the input and print each batch as JSON instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}

impl Opts {
    pub const fn log_level(&self) -> &'static str {
        match self.quiet {
            0 => match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            },
            1 => "warn",
            2 => "error",
            _ => "off",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    pub fn use_color(self) -> bool {
        match self {
            Color::Auto => std::io::stderr().is_terminal(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_command() {
        Opts::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let opts = Opts::try_parse_from([
            "timestream-sink",
            "--config",
            "sink.toml",
            "--input",
            "events.ndjson",
            "--log-format",
            "json",
            "--dry-run",
            "-vv",
        ])
        .unwrap();

        assert_eq!(opts.config, PathBuf::from("sink.toml"));
        assert_eq!(opts.input, Some(PathBuf::from("events.ndjson")));
        assert_eq!(opts.log_format, LogFormat::Json);
        assert!(opts.dry_run);
        assert!(!opts.require_healthy);
        assert_eq!(opts.log_level(), "trace");
    }

    #[test]
    fn quiet_overrides_verbose() {
        let opts =
            Opts::try_parse_from(["timestream-sink", "-c", "sink.toml", "-v", "-qq"]).unwrap();
        assert_eq!(opts.log_level(), "error");
    }
}
