use std::task::{Context, Poll};

use aws_sdk_timestreamwrite::{
    Client as TimestreamClient,
    error::{BuildError as SdkBuildError, DisplayErrorContext, SdkError},
    operation::write_records::WriteRecordsError,
    types::{
        Dimension as SdkDimension, DimensionValueType, MeasureValueType, Record as SdkRecord,
        RejectedRecord, TimeUnit,
    },
};
use futures::future::BoxFuture;
use snafu::{ResultExt, Snafu};
use tower::Service;

use super::{DataPoint, TimestreamRequest};

#[derive(Debug, Snafu)]
pub enum TimestreamError {
    #[snafu(display("Could not build Timestream record: {}", source))]
    BuildRecord { source: SdkBuildError },
    #[snafu(display("WriteRecords failed: {}", DisplayErrorContext(source)))]
    WriteRecords {
        source: SdkError<WriteRecordsError>,
    },
}

impl TimestreamError {
    /// The records the service refused, when the whole call failed on a
    /// `RejectedRecordsException`. Records not listed were ingested.
    pub fn rejected_records(&self) -> Option<&[RejectedRecord]> {
        match self {
            TimestreamError::WriteRecords { source } => match source.as_service_error()? {
                WriteRecordsError::RejectedRecordsException(error) => {
                    Some(error.rejected_records())
                }
                _ => None,
            },
            TimestreamError::BuildRecord { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct TimestreamResponse {
    pub count: usize,
    /// Total reported by the service, if it sent one.
    pub ingested: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct TimestreamService {
    client: TimestreamClient,
}

impl TimestreamService {
    pub const fn new(client: TimestreamClient) -> Self {
        Self { client }
    }
}

impl Service<TimestreamRequest> for TimestreamService {
    type Response = TimestreamResponse;
    type Error = TimestreamError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    // Emission of an internal event in case of errors is handled upstream by the caller.
    fn poll_ready(&mut self, _cx: &mut Context) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    // Emission of internal events for errors and dropped events is handled upstream by the caller.
    fn call(&mut self, request: TimestreamRequest) -> Self::Future {
        let client = self.client.clone();

        Box::pin(async move {
            let count = request.len();
            let records = request
                .records
                .into_iter()
                .map(sdk_record)
                .collect::<Result<Vec<_>, _>>()
                .context(BuildRecordSnafu)?;

            let output = client
                .write_records()
                .database_name(request.database_name)
                .table_name(request.table_name)
                .set_records(Some(records))
                .send()
                .await
                .context(WriteRecordsSnafu)?;

            Ok(TimestreamResponse {
                count,
                ingested: output.records_ingested().map(|ingested| ingested.total()),
            })
        })
    }
}

fn sdk_record(point: DataPoint) -> Result<SdkRecord, SdkBuildError> {
    let dimensions = point
        .dimensions
        .into_iter()
        .map(|dimension| {
            SdkDimension::builder()
                .name(dimension.name)
                .value(dimension.value)
                .dimension_value_type(DimensionValueType::from(dimension.dimension_value_type))
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SdkRecord::builder()
        .set_dimensions(Some(dimensions))
        .measure_name(point.measure_name)
        .measure_value(point.measure_value)
        .measure_value_type(MeasureValueType::from(point.measure_value_type.as_str()))
        .time(point.time)
        .time_unit(TimeUnit::from(point.time_unit))
        .build())
}
