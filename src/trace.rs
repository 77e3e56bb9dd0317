use tracing_subscriber::{EnvFilter, fmt, util::SubscriberInitExt};

/// Installs the global subscriber. Logs go to stderr; stdout is left to dry-run output.
///
/// `levels` is an `EnvFilter` directive such as `timestream_sink=debug,aws_smithy_runtime=warn`.
pub fn init(color: bool, json: bool, levels: &str) {
    let filter = EnvFilter::try_new(levels).unwrap_or_else(|error| {
        eprintln!("Invalid log filter {levels:?}, falling back to `info`: {error}");
        EnvFilter::new("info")
    });

    // Ignore errors when setting, since tests can initialize this multiple times.
    let _ = if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .flatten_event(true)
            .finish()
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(color)
            .finish()
            .try_init()
    };
}

/// Builds the filter directive for the crate and the AWS stack from a single level.
pub fn levels(level: &str) -> String {
    match level {
        "off" => "off".to_owned(),
        level => [
            format!("timestream_sink={level}"),
            "aws_config=warn".to_owned(),
            "aws_smithy_runtime=warn".to_owned(),
            "aws_sdk_timestreamwrite=warn".to_owned(),
        ]
        .join(","),
    }
}
