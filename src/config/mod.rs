use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu};

pub use crate::sinks::timestream::TimestreamSinkConfig;

mod format;
mod vars;

pub use self::format::Format;

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Could not read config file {:?}: {}", path, source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Could not tell the format of config file {:?}; use a .toml, .yaml, .yml or .json extension.",
        path
    ))]
    UnknownFormat { path: PathBuf },
    #[snafu(display("{}", errors.join("\n")))]
    Interpolate { errors: Vec<String> },
    #[snafu(display("Invalid {} config: {}", format, message))]
    Parse { format: Format, message: String },
}

/// Reads, interpolates and parses the sink configuration at `path`.
pub fn load_from_path(path: &Path) -> Result<TimestreamSinkConfig, ConfigError> {
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnknownFormat {
        path: path.to_owned(),
    })?;
    let content = std::fs::read_to_string(path).context(ReadSnafu { path })?;

    debug!(message = "Loading configuration.", path = ?path, %format);
    load_from_str(&content, format)
}

/// Parses configuration text, substituting variables from the process environment first.
pub fn load_from_str(content: &str, format: Format) -> Result<TimestreamSinkConfig, ConfigError> {
    let vars = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();

    load_with_vars(content, format, &vars)
}

fn load_with_vars(
    content: &str,
    format: Format,
    vars: &HashMap<String, String>,
) -> Result<TimestreamSinkConfig, ConfigError> {
    let interpolated =
        vars::interpolate(content, vars).map_err(|errors| ConfigError::Interpolate { errors })?;

    format::deserialize(&interpolated, format).map_err(|message| ConfigError::Parse { format, message })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn interpolates_before_parsing() {
        let config = load_with_vars(
            r#"
            region = "${REGION:-us-east-1}"
            database = "$DB"
            table = "${TABLE:?table is required}"
        "#,
            Format::Toml,
            &vars(&[("DB", "metrics"), ("TABLE", "requests")]),
        )
        .unwrap();

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.database.as_deref(), Some("metrics"));
        assert_eq!(config.table.as_deref(), Some("requests"));
    }

    #[test]
    fn missing_required_variable_fails() {
        let error = load_with_vars(
            r#"
            region = "us-east-1"
            table = "${TABLE:?table is required}"
        "#,
            Format::Toml,
            &HashMap::new(),
        )
        .unwrap_err();

        assert!(matches!(error, ConfigError::Interpolate { .. }));
        assert!(error.to_string().contains("table is required"));
    }

    #[test]
    fn parse_errors_name_the_format() {
        let error = load_with_vars("region: [", Format::Yaml, &HashMap::new()).unwrap_err();

        assert!(matches!(
            error,
            ConfigError::Parse {
                format: Format::Yaml,
                ..
            }
        ));
        assert!(error.to_string().starts_with("Invalid yaml config"));
    }

    #[test]
    fn loads_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "region: us-west-2\ndatabase: db\ntable: t\nhealthcheck: false").unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.region, "us-west-2");
        assert!(!config.healthcheck.enabled);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();

        assert!(matches!(
            load_from_path(file.path()),
            Err(ConfigError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            load_from_path(&dir.path().join("absent.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
