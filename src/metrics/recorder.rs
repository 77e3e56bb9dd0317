#[cfg(test)]
use std::cell::OnceCell;
use std::sync::Arc;

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use metrics_util::registry::{AtomicStorage, Registry as MetricsRegistry};

pub(super) type Registry = MetricsRegistry<Key, AtomicStorage>;

#[cfg(test)]
thread_local!(static LOCAL_REGISTRY: OnceCell<Registry> = const { OnceCell::new() });

/// [`SinkRecorder`] is a [`metrics::Recorder`] that keeps every handle in a registry the
/// [`Controller`](super::Controller) can read back.
#[derive(Clone, Debug)]
pub(super) enum SinkRecorder {
    Global(Arc<Registry>),
    #[cfg(test)]
    ThreadLocal,
}

impl SinkRecorder {
    pub(super) fn new_global() -> Self {
        Self::Global(Arc::new(Registry::atomic()))
    }

    #[cfg(test)]
    pub(super) fn new_test() -> Self {
        Self::with_thread_local(Registry::clear);
        Self::ThreadLocal
    }

    pub(super) fn with_registry<T>(&self, doit: impl FnOnce(&Registry) -> T) -> T {
        match &self {
            Self::Global(registry) => doit(registry),
            #[cfg(test)]
            Self::ThreadLocal => Self::with_thread_local(doit),
        }
    }

    #[cfg(test)]
    fn with_thread_local<T>(doit: impl FnOnce(&Registry) -> T) -> T {
        LOCAL_REGISTRY.with(|oc| doit(oc.get_or_init(Registry::atomic)))
    }
}

impl Recorder for SinkRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        self.with_registry(|r| r.get_or_create_counter(key, |c| Counter::from_arc(Arc::clone(c))))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        self.with_registry(|r| r.get_or_create_gauge(key, |g| Gauge::from_arc(Arc::clone(g))))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        self.with_registry(|r| {
            r.get_or_create_histogram(key, |h| Histogram::from_arc(Arc::clone(h)))
        })
    }
}
