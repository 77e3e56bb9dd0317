use metrics::counter;

use super::{ComponentEventsDropped, InternalEvent, error_stage, error_type};
use crate::codecs::DecodeError;

#[derive(Debug)]
pub struct DecoderDeserializeFailed<'a> {
    pub error: &'a DecodeError,
    pub line: usize,
}

impl InternalEvent for DecoderDeserializeFailed<'_> {
    fn emit(self) {
        let reason = "Failed deserializing input line.";
        warn!(
            message = reason,
            error = %self.error,
            line = self.line,
            error_type = error_type::PARSER_FAILED,
            stage = error_stage::RECEIVING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::PARSER_FAILED,
            "stage" => error_stage::RECEIVING,
        )
        .increment(1);

        emit!(ComponentEventsDropped { count: 1, reason });
    }
}

#[derive(Debug)]
pub struct EventsReceived {
    pub count: usize,
    pub byte_size: usize,
}

impl InternalEvent for EventsReceived {
    fn emit(self) {
        trace!(
            message = "Events received.",
            count = self.count,
            byte_size = self.byte_size,
        );
        counter!("component_received_events_total").increment(self.count as u64);
        counter!("component_received_event_bytes_total").increment(self.byte_size as u64);
    }
}
