use std::time::Duration;

use aws_sdk_timestreamwrite::Client as TimestreamClient;
use futures::{FutureExt, future};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use super::{RecordMapper, TimestreamRequestBuilder, TimestreamService, TimestreamSink};
use crate::{
    aws::{AwsAuthentication, ClientBuilder, RegionOrEndpoint, create_client, region::EndpointError},
    sinks::Healthcheck,
    tls::TlsSettings,
};

pub const DATABASE_ENV_VAR: &str = "AWS_TIMESTREAM_DATABASE";
pub const TABLE_ENV_VAR: &str = "AWS_TIMESTREAM_TABLE";

/// `WriteRecords` accepts at most this many records per call.
pub const MAX_BATCH_EVENTS: usize = 100;

#[derive(Debug, Snafu)]
pub enum BuildError {
    #[snafu(display(
        "No database configured: set `database` or the AWS_TIMESTREAM_DATABASE environment variable."
    ))]
    MissingDatabase,
    #[snafu(display(
        "No table configured: set `table` or the AWS_TIMESTREAM_TABLE environment variable."
    ))]
    MissingTable,
    #[snafu(display(
        "`batch.max_events` must be between 1 and {}, got {}.",
        MAX_BATCH_EVENTS,
        max_events
    ))]
    InvalidBatchSize { max_events: usize },
    #[snafu(display("`batch.timeout_secs` must be a positive number, got {}.", timeout_secs))]
    InvalidBatchTimeout { timeout_secs: f64 },
    #[snafu(display("`target_measure.name` must not be empty."))]
    EmptyMeasureName,
    #[snafu(display("`target_measure.type` must not be empty."))]
    EmptyMeasureType,
    #[snafu(display("{}", source))]
    InvalidEndpoint { source: EndpointError },
}

/// The single record field written as the measure of each data point.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MeasureConfig {
    /// Name of the record field holding the measure value.
    pub name: String,

    /// Timestream type of the measure value, for example `DOUBLE`, `BIGINT` or `VARCHAR`.
    #[serde(rename = "type")]
    pub value_type: String,
}

/// How input is grouped into `WriteRecords` calls.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// The maximum number of records sent in one call.
    #[serde(default = "default_max_events")]
    pub max_events: usize,

    /// The maximum age of a partial batch before it is sent, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

const fn default_max_events() -> usize {
    MAX_BATCH_EVENTS
}

const fn default_timeout_secs() -> f64 {
    1.0
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_events: default_max_events(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_events == 0 || self.max_events > MAX_BATCH_EVENTS {
            return Err(BuildError::InvalidBatchSize {
                max_events: self.max_events,
            });
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            return Err(BuildError::InvalidBatchTimeout {
                timeout_secs: self.timeout_secs,
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthcheckConfig {
    /// Whether `DescribeTable` is called on startup.
    #[serde(default = "crate::serde::default_true")]
    pub enabled: bool,
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl From<bool> for HealthcheckConfig {
    fn from(enabled: bool) -> Self {
        Self { enabled }
    }
}

/// Configuration for the Timestream sink.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimestreamSinkConfig {
    /// The AWS region of the target table.
    pub region: String,

    /// Custom endpoint for use with AWS-compatible services.
    ///
    /// When set, requests go straight to this URL and endpoint discovery is not used.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Falls back to `AWS_TIMESTREAM_DATABASE` when absent.
    #[serde(default)]
    pub database: Option<String>,

    /// Falls back to `AWS_TIMESTREAM_TABLE` when absent.
    #[serde(default)]
    pub table: Option<String>,

    #[serde(default = "crate::serde::default_true")]
    pub ssl_verify_peer: bool,

    #[serde(default, alias = "auth")]
    pub aws_credentials: AwsAuthentication,

    #[serde(default, alias = "measure")]
    pub target_measure: Option<MeasureConfig>,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default, deserialize_with = "crate::serde::bool_or_struct")]
    pub healthcheck: HealthcheckConfig,
}

pub struct TimestreamClientBuilder;

impl ClientBuilder for TimestreamClientBuilder {
    type Client = TimestreamClient;

    fn build(config: &aws_types::SdkConfig) -> Self::Client {
        TimestreamClient::new(config)
    }
}

impl TimestreamSinkConfig {
    pub async fn build(&self) -> crate::Result<(TimestreamSink, Healthcheck)> {
        let request_builder = self.request_builder()?;
        let client = self.create_client().await?;

        let healthcheck = if self.healthcheck.enabled {
            healthcheck(
                client.clone(),
                request_builder.database().to_owned(),
                request_builder.table().to_owned(),
            )
            .boxed()
        } else {
            future::ok::<(), crate::Error>(()).boxed()
        };

        let sink = TimestreamSink::new(request_builder, TimestreamService::new(client));
        Ok((sink, healthcheck))
    }

    /// Validates everything that does not need AWS and builds the mapping half of the sink.
    pub fn request_builder(&self) -> Result<TimestreamRequestBuilder, BuildError> {
        self.batch.validate()?;
        self.region_or_endpoint()
            .endpoint()
            .context(InvalidEndpointSnafu)?;

        if let Some(measure) = &self.target_measure {
            if measure.name.is_empty() {
                return Err(BuildError::EmptyMeasureName);
            }
            if measure.value_type.is_empty() {
                return Err(BuildError::EmptyMeasureType);
            }
        }

        let (database, table) = self.resolve_target()?;
        Ok(TimestreamRequestBuilder::new(
            database,
            table,
            RecordMapper::new(self.target_measure.clone()),
        ))
    }

    /// Returns the database and table to write to, falling back to the environment.
    pub fn resolve_target(&self) -> Result<(String, String), BuildError> {
        self.resolve_target_with(|name| std::env::var(name).ok())
    }

    fn resolve_target_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(String, String), BuildError> {
        let resolve = |configured: &Option<String>, var: &str| {
            configured
                .clone()
                .or_else(|| lookup(var))
                .filter(|name| !name.is_empty())
        };

        let database = resolve(&self.database, DATABASE_ENV_VAR).ok_or(BuildError::MissingDatabase)?;
        let table = resolve(&self.table, TABLE_ENV_VAR).ok_or(BuildError::MissingTable)?;
        Ok((database, table))
    }

    fn region_or_endpoint(&self) -> RegionOrEndpoint {
        RegionOrEndpoint {
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    async fn create_client(&self) -> crate::Result<TimestreamClient> {
        let region = self.region_or_endpoint();
        let endpoint = region.endpoint().context(InvalidEndpointSnafu)?;
        let discover = endpoint.is_none();

        let client = create_client::<TimestreamClientBuilder>(
            &self.aws_credentials,
            region.region(),
            endpoint,
            &TlsSettings::new(self.ssl_verify_peer),
        )
        .await?;

        if !discover {
            return Ok(client);
        }

        // Timestream serves writes from cell endpoints that have to be discovered and refreshed.
        let (client, reloader) = client.with_endpoint_discovery_enabled().await?;
        tokio::spawn(reloader.reload_task());
        Ok(client)
    }
}

async fn healthcheck(client: TimestreamClient, database: String, table: String) -> crate::Result<()> {
    client
        .describe_table()
        .database_name(database)
        .table_name(table)
        .send()
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn parse(config: &str) -> TimestreamSinkConfig {
        toml::from_str(config).unwrap()
    }

    #[test]
    fn parses_minimal_config() {
        let config = parse(r#"region = "us-east-1""#);

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint, None);
        assert!(config.ssl_verify_peer);
        assert_eq!(config.aws_credentials, AwsAuthentication::default());
        assert_eq!(config.target_measure, None);
        assert_eq!(config.batch, BatchConfig::default());
        assert!(config.healthcheck.enabled);
    }

    #[test]
    fn parses_full_config() {
        let config = parse(
            r#"
            region = "eu-west-1"
            endpoint = "http://localhost:8000"
            database = "metrics"
            table = "requests"
            ssl_verify_peer = false
            healthcheck = false

            [aws_credentials]
            access_key_id = "key"
            secret_access_key = "secret"

            [target_measure]
            name = "latency"
            type = "DOUBLE"

            [batch]
            max_events = 25
            timeout_secs = 0.5
        "#,
        );

        assert_eq!(config.database.as_deref(), Some("metrics"));
        assert_eq!(config.table.as_deref(), Some("requests"));
        assert!(!config.ssl_verify_peer);
        assert!(!config.healthcheck.enabled);
        assert!(matches!(
            config.aws_credentials,
            AwsAuthentication::AccessKey { .. }
        ));
        assert_eq!(
            config.target_measure,
            Some(MeasureConfig {
                name: "latency".into(),
                value_type: "DOUBLE".into(),
            })
        );
        assert_eq!(config.batch.max_events, 25);
        assert_eq!(config.batch.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn measure_alias_is_accepted() {
        let config = parse(
            r#"
            region = "us-east-1"
            measure = { name = "m", type = "BIGINT" }
        "#,
        );

        assert_eq!(config.target_measure.unwrap().name, "m");
    }

    #[test]
    fn healthcheck_accepts_struct_form() {
        let config = parse(
            r#"
            region = "us-east-1"
            healthcheck.enabled = false
        "#,
        );

        assert!(!config.healthcheck.enabled);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = toml::from_str::<TimestreamSinkConfig>(
            r#"
            region = "us-east-1"
            databse = "typo"
        "#,
        );
        assert!(result.is_err());

        let result = toml::from_str::<TimestreamSinkConfig>(
            r#"
            region = "us-east-1"
            target_measure = { name = "m", type = "DOUBLE", unit = "ms" }
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn region_is_required() {
        assert!(toml::from_str::<TimestreamSinkConfig>(r#"database = "db""#).is_err());
    }

    #[test]
    fn configured_target_wins_over_environment() {
        let config = parse(
            r#"
            region = "us-east-1"
            database = "db"
            table = "t"
        "#,
        );

        let target = config
            .resolve_target_with(|name| Some(format!("env-{name}")))
            .unwrap();
        assert_eq!(target, ("db".to_owned(), "t".to_owned()));
    }

    #[test]
    fn target_falls_back_to_environment() {
        let config = parse(
            r#"
            region = "us-east-1"
            table = "t"
        "#,
        );

        let target = config
            .resolve_target_with(|name| (name == DATABASE_ENV_VAR).then(|| "env-db".to_owned()))
            .unwrap();
        assert_eq!(target, ("env-db".to_owned(), "t".to_owned()));
    }

    #[test]
    fn missing_target_is_an_error() {
        let config = parse(r#"region = "us-east-1""#);

        assert!(matches!(
            config.resolve_target_with(|_| None),
            Err(BuildError::MissingDatabase)
        ));

        let config = parse(
            r#"
            region = "us-east-1"
            database = "db"
            table = ""
        "#,
        );
        assert!(matches!(
            config.resolve_target_with(|_| None),
            Err(BuildError::MissingTable)
        ));
    }

    #[test]
    #[serial]
    fn resolve_target_reads_process_environment() {
        // SAFETY: tests touching the environment are serialized.
        unsafe {
            std::env::set_var(DATABASE_ENV_VAR, "from-env");
            std::env::set_var(TABLE_ENV_VAR, "table-from-env");
        }

        let config = parse(r#"region = "us-east-1""#);
        let target = config.resolve_target();

        unsafe {
            std::env::remove_var(DATABASE_ENV_VAR);
            std::env::remove_var(TABLE_ENV_VAR);
        }

        assert_eq!(
            target.unwrap(),
            ("from-env".to_owned(), "table-from-env".to_owned())
        );
    }

    #[test]
    fn batch_size_is_capped_at_service_limit() {
        for (max_events, valid) in [(0, false), (1, true), (100, true), (101, false)] {
            let batch = BatchConfig {
                max_events,
                ..Default::default()
            };
            assert_eq!(batch.validate().is_ok(), valid, "max_events = {max_events}");
        }

        let batch = BatchConfig {
            timeout_secs: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            batch.validate(),
            Err(BuildError::InvalidBatchTimeout { .. })
        ));
    }

    #[test]
    fn request_builder_validates_config() {
        let config = parse(
            r#"
            region = "us-east-1"
            database = "db"
            table = "t"
            endpoint = "localhost:8000"
        "#,
        );
        assert!(matches!(
            config.request_builder(),
            Err(BuildError::InvalidEndpoint { .. })
        ));

        let config = parse(
            r#"
            region = "us-east-1"
            database = "db"
            table = "t"
            target_measure = { name = "", type = "DOUBLE" }
        "#,
        );
        assert!(matches!(
            config.request_builder(),
            Err(BuildError::EmptyMeasureName)
        ));

        let config = parse(
            r#"
            region = "us-east-1"
            database = "db"
            table = "t"
            target_measure = { name = "m", type = "DOUBLE" }
        "#,
        );
        let request_builder = config.request_builder().unwrap();
        assert_eq!(request_builder.database(), "db");
        assert_eq!(request_builder.table(), "t");
        assert_eq!(request_builder.mapper().measure().unwrap().name, "m");
    }
}
