use metrics::counter;

use super::InternalEvent;

/// Records that failed on the way to the service and will not be retried.
#[derive(Debug)]
pub struct ComponentEventsDropped<'a> {
    pub count: usize,
    pub reason: &'a str,
}

impl InternalEvent for ComponentEventsDropped<'_> {
    fn emit(self) {
        error!(
            message = "Events dropped",
            intentional = false,
            count = self.count,
            reason = self.reason,
        );
        counter!(
            "component_discarded_events_total",
            "intentional" => "false",
        )
        .increment(self.count as u64);
    }
}
