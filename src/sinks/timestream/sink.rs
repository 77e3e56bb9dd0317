use tower::ServiceExt;

use super::{TimestreamRequestBuilder, TimestreamService};
use crate::{
    event::Event,
    internal_events::{TimestreamRecordsRejected, TimestreamRecordsWritten, TimestreamWriteError},
};

/// Outcome of writing one chunk, as reported back to the driver.
///
/// Write failures are reported here and logged, never returned as errors: a chunk that could not
/// be written is not retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Nothing in the chunk could be mapped, so no call was made.
    Dropped,
    Delivered,
    /// The service refused some records; the others were ingested.
    PartiallyRejected,
    Errored,
}

impl EventStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventStatus::Dropped => "dropped",
            EventStatus::Delivered => "delivered",
            EventStatus::PartiallyRejected => "partially_rejected",
            EventStatus::Errored => "errored",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimestreamSink {
    request_builder: TimestreamRequestBuilder,
    service: TimestreamService,
}

impl TimestreamSink {
    pub const fn new(request_builder: TimestreamRequestBuilder, service: TimestreamService) -> Self {
        Self {
            request_builder,
            service,
        }
    }

    pub async fn write(&self, events: &[Event]) -> EventStatus {
        let Some(request) = self.request_builder.build_request(events) else {
            return EventStatus::Dropped;
        };
        let count = request.len();

        match self.service.clone().oneshot(request).await {
            Ok(response) => {
                emit!(TimestreamRecordsWritten {
                    count: response.count,
                    ingested: response.ingested,
                });
                EventStatus::Delivered
            }
            Err(error) => match error.rejected_records() {
                Some(rejected) => {
                    emit!(TimestreamRecordsRejected { rejected });
                    emit!(TimestreamRecordsWritten {
                        count: count.saturating_sub(rejected.len()),
                        ingested: None,
                    });
                    EventStatus::PartiallyRejected
                }
                None => {
                    emit!(TimestreamWriteError {
                        error: &error,
                        count,
                    });
                    EventStatus::Errored
                }
            },
        }
    }
}
