use aws_sdk_timestreamwrite::types::RejectedRecord;
use metrics::counter;

use super::{ComponentEventsDropped, InternalEvent, error_stage, error_type};
use crate::{
    event::Record,
    sinks::timestream::{MappingError, TimestreamError},
};

#[derive(Debug)]
pub struct TimestreamRecordSkipped<'a> {
    pub error: &'a MappingError,
    pub record: &'a Record,
}

impl InternalEvent for TimestreamRecordSkipped<'_> {
    fn emit(self) {
        let reason = "Record could not be mapped to a Timestream data point.";
        warn!(
            message = reason,
            error = %self.error,
            error_code = self.error.code(),
            record = ?self.record,
            error_type = error_type::ENCODER_FAILED,
            stage = error_stage::PROCESSING,
        );
        counter!(
            "component_errors_total",
            "error_code" => self.error.code(),
            "error_type" => error_type::ENCODER_FAILED,
            "stage" => error_stage::PROCESSING,
        )
        .increment(1);

        emit!(ComponentEventsDropped { count: 1, reason });
    }
}

#[derive(Debug)]
pub struct TimestreamRecordsRejected<'a> {
    pub rejected: &'a [RejectedRecord],
}

impl InternalEvent for TimestreamRecordsRejected<'_> {
    fn emit(self) {
        let reason = "Timestream rejected records.";
        for record in self.rejected {
            error!(
                message = reason,
                record_index = record.record_index(),
                rejection_reason = record.reason().unwrap_or_default(),
                existing_version = ?record.existing_version(),
                error_type = error_type::REQUEST_REJECTED,
                stage = error_stage::SENDING,
            );
        }
        counter!(
            "component_errors_total",
            "error_code" => "rejected_records",
            "error_type" => error_type::REQUEST_REJECTED,
            "stage" => error_stage::SENDING,
        )
        .increment(1);

        emit!(ComponentEventsDropped {
            count: self.rejected.len(),
            reason,
        });
    }
}

#[derive(Debug)]
pub struct TimestreamWriteError<'a> {
    pub error: &'a TimestreamError,
    pub count: usize,
}

impl InternalEvent for TimestreamWriteError<'_> {
    fn emit(self) {
        let reason = "Failed to write records to Timestream.";
        error!(
            message = reason,
            error = %self.error,
            error_type = error_type::REQUEST_FAILED,
            stage = error_stage::SENDING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::REQUEST_FAILED,
            "stage" => error_stage::SENDING,
        )
        .increment(1);

        emit!(ComponentEventsDropped {
            count: self.count,
            reason,
        });
    }
}

#[derive(Debug)]
pub struct TimestreamRecordsWritten {
    pub count: usize,
    pub ingested: Option<i32>,
}

impl InternalEvent for TimestreamRecordsWritten {
    fn emit(self) {
        debug!(
            message = "Wrote records to Timestream.",
            count = self.count,
            ingested = ?self.ingested,
        );
        counter!("component_sent_events_total").increment(self.count as u64);
    }
}

#[derive(Debug)]
pub struct TimestreamHealthcheckError<'a> {
    pub error: &'a crate::Error,
}

impl InternalEvent for TimestreamHealthcheckError<'_> {
    fn emit(self) {
        error!(
            message = "Healthcheck failed.",
            error = %self.error,
            error_type = error_type::HEALTHCHECK_FAILED,
            stage = error_stage::SENDING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::HEALTHCHECK_FAILED,
            "stage" => error_stage::SENDING,
        )
        .increment(1);
    }
}
