use std::{io::Write, time::Duration};

use clap::Parser;
use futures::Stream;
use snafu::Snafu;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    runtime::{self, Runtime},
};
use tokio_stream::{StreamExt, wrappers::LinesStream};

use crate::{
    cli::{LogFormat, Opts},
    codecs::JsonDeserializer,
    config::{self, TimestreamSinkConfig},
    event::Event,
    metrics,
    internal_events::{
        ConfigLoadFailed, DecoderDeserializeFailed, EventsReceived, InputReadFailed, SinkStarted,
        SinkStopped, TimestreamHealthcheckError,
    },
    sinks::{
        Healthcheck,
        timestream::{BatchConfig, EventStatus, TimestreamRequestBuilder, TimestreamSink},
    },
    trace,
};

const HEALTHCHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Snafu)]
enum HealthcheckError {
    #[snafu(display("Healthcheck timed out."))]
    Timeout,
}

/// Tally of chunk outcomes over a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub batches: usize,
    pub delivered: usize,
    pub partially_rejected: usize,
    pub errored: usize,
    pub dropped: usize,
}

impl Summary {
    pub fn record(&mut self, status: EventStatus) {
        self.batches += 1;
        let tally = match status {
            EventStatus::Delivered => &mut self.delivered,
            EventStatus::PartiallyRejected => &mut self.partially_rejected,
            EventStatus::Errored => &mut self.errored,
            EventStatus::Dropped => &mut self.dropped,
        };
        *tally += 1;
    }
}

pub struct Application {
    opts: Opts,
    config: TimestreamSinkConfig,
    runtime: Runtime,
}

impl Application {
    pub fn prepare() -> Result<Self, exitcode::ExitCode> {
        Self::prepare_from_opts(Opts::parse())
    }

    pub fn prepare_from_opts(opts: Opts) -> Result<Self, exitcode::ExitCode> {
        let level = std::env::var("LOG").unwrap_or_else(|_| trace::levels(opts.log_level()));
        trace::init(
            opts.color.use_color(),
            opts.log_format == LogFormat::Json,
            &level,
        );
        info!(message = "Log level is enabled.", level = ?level);

        if let Err(error) = metrics::init_global() {
            error!(message = "Failed to initialize metrics.", %error);
            return Err(exitcode::SOFTWARE);
        }

        let config = config::load_from_path(&opts.config).map_err(|error| {
            emit!(ConfigLoadFailed { error: &error });
            exitcode::CONFIG
        })?;

        let runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("timestream-sink-worker")
            .build()
            .map_err(|error| {
                error!(message = "Unable to create async runtime.", %error);
                exitcode::OSERR
            })?;

        Ok(Self {
            opts,
            config,
            runtime,
        })
    }

    pub fn run(self) -> exitcode::ExitCode {
        let Self {
            opts,
            config,
            runtime,
        } = self;

        runtime.block_on(start(opts, config))
    }
}

async fn start(opts: Opts, config: TimestreamSinkConfig) -> exitcode::ExitCode {
    let input: Box<dyn AsyncRead + Unpin + Send> = match &opts.input {
        Some(path) => match tokio::fs::File::open(path).await {
            Ok(file) => Box::new(file),
            Err(error) => {
                error!(message = "Could not open input file.", path = ?path, %error);
                return exitcode::NOINPUT;
            }
        },
        None => Box::new(tokio::io::stdin()),
    };

    emit!(SinkStarted {
        dry_run: opts.dry_run
    });

    let summary = if opts.dry_run {
        let request_builder = match config.request_builder() {
            Ok(request_builder) => request_builder,
            Err(error) => {
                error!(message = "Configuration error.", %error);
                return exitcode::CONFIG;
            }
        };

        match dry_run(&request_builder, &config.batch, input, std::io::stdout()).await {
            Ok(summary) => summary,
            Err(error) => {
                error!(message = "Could not write to stdout.", %error);
                return exitcode::IOERR;
            }
        }
    } else {
        let (sink, healthcheck) = match config.build().await {
            Ok(built) => built,
            Err(error) => {
                error!(message = "Could not build the Timestream sink.", %error);
                return exitcode::CONFIG;
            }
        };

        if config.healthcheck.enabled && !run_healthcheck(healthcheck).await && opts.require_healthy
        {
            return exitcode::UNAVAILABLE;
        }

        write_all(&sink, &config.batch, input).await
    };

    emit!(SinkStopped {
        summary: &summary,
        controller: metrics::get_controller().ok(),
    });
    exitcode::OK
}

async fn run_healthcheck(healthcheck: Healthcheck) -> bool {
    let result = match tokio::time::timeout(HEALTHCHECK_TIMEOUT, healthcheck).await {
        Ok(result) => result,
        Err(_) => Err(HealthcheckError::Timeout.into()),
    };

    match result {
        Ok(()) => {
            info!("Healthcheck passed.");
            true
        }
        Err(error) => {
            emit!(TimestreamHealthcheckError { error: &error });
            false
        }
    }
}

/// Decodes newline-delimited `[time, record]` input into chunks of at most `max_events`,
/// flushing a partial chunk once it is `timeout_secs` old.
///
/// Blank lines are ignored; lines that fail to decode are reported and skipped. A read error
/// ends the stream.
pub fn batches<R>(input: R, batch: &BatchConfig) -> impl Stream<Item = Vec<Event>>
where
    R: AsyncRead + Unpin + Send,
{
    let decoder = JsonDeserializer::new();
    let mut line_number = 0;

    LinesStream::new(BufReader::new(input).lines())
        .map_while(|line| match line {
            Ok(line) => Some(line),
            Err(error) => {
                emit!(InputReadFailed { error: &error });
                None
            }
        })
        .filter_map(move |line| {
            line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                return None;
            }

            match decoder.parse(line.as_bytes()) {
                Ok(event) => {
                    emit!(EventsReceived {
                        count: 1,
                        byte_size: line.len(),
                    });
                    Some(event)
                }
                Err(error) => {
                    emit!(DecoderDeserializeFailed {
                        error: &error,
                        line: line_number,
                    });
                    None
                }
            }
        })
        .chunks_timeout(batch.max_events, batch.timeout())
}

/// Writes every chunk of `input` through `sink`, in order. Failed chunks are tallied, not retried.
pub async fn write_all<R>(sink: &TimestreamSink, batch: &BatchConfig, input: R) -> Summary
where
    R: AsyncRead + Unpin + Send,
{
    let mut summary = Summary::default();
    let batches = batches(input, batch);
    tokio::pin!(batches);

    while let Some(events) = batches.next().await {
        let status = sink.write(&events).await;
        debug!(message = "Batch written.", status = status.as_str());
        summary.record(status);
    }

    summary
}

/// Maps every chunk of `input` and prints the `WriteRecords` body it would produce, one JSON
/// document per line.
pub async fn dry_run<R, W>(
    request_builder: &TimestreamRequestBuilder,
    batch: &BatchConfig,
    input: R,
    mut output: W,
) -> std::io::Result<Summary>
where
    R: AsyncRead + Unpin + Send,
    W: Write,
{
    let mut summary = Summary::default();
    let batches = batches(input, batch);
    tokio::pin!(batches);

    while let Some(events) = batches.next().await {
        let Some(request) = request_builder.build_request(&events) else {
            summary.record(EventStatus::Dropped);
            continue;
        };

        serde_json::to_writer(&mut output, &request)?;
        writeln!(output)?;
        summary.record(EventStatus::Delivered);
    }

    output.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value as JsonValue, json};
    use similar_asserts::assert_eq;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    use super::*;
    use crate::{
        aws::AwsAuthentication,
        sinks::timestream::{HealthcheckConfig, MeasureConfig, RecordMapper},
    };

    const INPUT: &str = r#"[1609499471, {"key0": "value0", "measure": 1000}]
[1609499472, {"key0": "", "measure": 1}]

not json
[1609499473.5, {"key0": "value1", "measure": 2}]
"#;

    fn batch(max_events: usize) -> BatchConfig {
        BatchConfig {
            max_events,
            timeout_secs: 60.0,
        }
    }

    fn request_builder() -> TimestreamRequestBuilder {
        TimestreamRequestBuilder::new(
            "db".into(),
            "table".into(),
            RecordMapper::new(Some(MeasureConfig {
                name: "measure".into(),
                value_type: "BIGINT".into(),
            })),
        )
    }

    #[tokio::test]
    async fn chunks_decoded_lines() {
        let chunks = batches(INPUT.as_bytes(), &batch(2))
            .collect::<Vec<_>>()
            .await;

        let timestamps = chunks
            .iter()
            .map(|chunk| chunk.iter().map(|e| e.timestamp).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(
            timestamps,
            vec![vec![1609499471, 1609499472], vec![1609499473]]
        );
    }

    #[tokio::test]
    async fn dry_run_prints_one_request_per_chunk() {
        let mut output = Vec::new();
        let summary = dry_run(&request_builder(), &batch(2), INPUT.as_bytes(), &mut output)
            .await
            .unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.delivered, 2);

        let lines = String::from_utf8(output).unwrap();
        let requests = lines
            .lines()
            .map(|line| serde_json::from_str::<JsonValue>(line).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["Records"].as_array().unwrap().len(), 1);
        assert_eq!(
            requests[1],
            json!({
                "DatabaseName": "db",
                "TableName": "table",
                "Records": [{
                    "Dimensions": [
                        {"DimensionValueType": "VARCHAR", "Name": "key0", "Value": "value1"}
                    ],
                    "Time": "1609499473",
                    "TimeUnit": "SECONDS",
                    "MeasureName": "measure",
                    "MeasureValue": "2",
                    "MeasureValueType": "BIGINT"
                }]
            })
        );
    }

    #[tokio::test]
    async fn dry_run_counts_empty_chunks_as_dropped() {
        let input = "[1, {\"a\": \"\"}]\n";
        let mut output = Vec::new();

        let summary = dry_run(&request_builder(), &batch(10), input.as_bytes(), &mut output)
            .await
            .unwrap();

        assert_eq!(summary.dropped, 1);
        assert!(output.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn partial_chunk_is_flushed_after_timeout() {
        let (mut writer, reader) = tokio::io::duplex(1024);
        let batch = BatchConfig {
            max_events: 10,
            timeout_secs: 1.0,
        };
        let chunks = batches(reader, &batch);
        tokio::pin!(chunks);

        tokio::io::AsyncWriteExt::write_all(&mut writer, b"[1, {\"a\": \"b\"}]\n")
            .await
            .unwrap();

        let chunk = chunks.next().await.unwrap();
        assert_eq!(chunk.len(), 1);
        drop(writer);
        assert!(chunks.next().await.is_none());
    }

    #[tokio::test]
    async fn write_all_tallies_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/x-amz-json-1.0")
                    .set_body_string(r#"{"RecordsIngested":{"Total":1,"MemoryStore":1,"MagneticStore":0}}"#),
            )
            .mount(&server)
            .await;

        let config = TimestreamSinkConfig {
            region: "us-east-1".into(),
            endpoint: Some(server.uri()),
            database: Some("db".into()),
            table: Some("table".into()),
            ssl_verify_peer: true,
            aws_credentials: AwsAuthentication::test_auth(),
            target_measure: None,
            batch: batch(1),
            healthcheck: HealthcheckConfig { enabled: false },
        };
        let (sink, _) = config.build().await.unwrap();

        let input = "[1, {\"a\": \"b\"}]\n[2, {\"a\": \"\"}]\n[3, {\"a\": \"c\"}]\n";
        let summary = write_all(&sink, &config.batch, input.as_bytes()).await;

        assert_eq!(
            summary,
            Summary {
                batches: 3,
                delivered: 2,
                partially_rejected: 0,
                errored: 0,
                dropped: 1,
            }
        );
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn healthcheck_failure_is_reported() {
        let failing: Healthcheck = Box::pin(async { Err::<(), crate::Error>("unreachable".into()) });
        assert!(!run_healthcheck(failing).await);

        let passing: Healthcheck = Box::pin(async { Ok::<(), crate::Error>(()) });
        assert!(run_healthcheck(passing).await);
    }
}
