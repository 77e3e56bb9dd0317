use metrics::counter;

use super::{InternalEvent, error_stage, error_type};
use crate::{app::Summary, config::ConfigError, metrics::Controller};

#[derive(Debug)]
pub struct SinkStarted {
    pub dry_run: bool,
}

impl InternalEvent for SinkStarted {
    fn emit(self) {
        info!(
            message = "Timestream sink has started.",
            version = %crate::get_version(),
            dry_run = self.dry_run,
        );
        counter!("started_total").increment(1);
    }
}

#[derive(Debug)]
pub struct SinkStopped<'a> {
    pub summary: &'a Summary,
    pub controller: Option<&'a Controller>,
}

impl InternalEvent for SinkStopped<'_> {
    fn emit(self) {
        let counter = |name: &str| {
            self.controller
                .map_or(0, |controller| controller.counter(name))
        };
        info!(
            message = "Input exhausted, Timestream sink has stopped.",
            batches = self.summary.batches,
            delivered = self.summary.delivered,
            partially_rejected = self.summary.partially_rejected,
            errored = self.summary.errored,
            dropped = self.summary.dropped,
            sent_events = counter("component_sent_events_total"),
            discarded_events = counter("component_discarded_events_total"),
            errors = counter("component_errors_total"),
        );
        counter!("stopped_total").increment(1);
    }
}

#[derive(Debug)]
pub struct ConfigLoadFailed<'a> {
    pub error: &'a ConfigError,
}

impl InternalEvent for ConfigLoadFailed<'_> {
    fn emit(self) {
        error!(
            message = "Configuration error.",
            error = %self.error,
            error_code = "config_load",
            stage = error_stage::PROCESSING,
        );
    }
}

#[derive(Debug)]
pub struct InputReadFailed<'a> {
    pub error: &'a std::io::Error,
}

impl InternalEvent for InputReadFailed<'_> {
    fn emit(self) {
        error!(
            message = "Failed reading input; no further lines will be read.",
            error = %self.error,
            error_type = error_type::READER_FAILED,
            stage = error_stage::RECEIVING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::READER_FAILED,
            "stage" => error_stage::RECEIVING,
        )
        .increment(1);
    }
}
