mod recorder;

use std::sync::{OnceLock, atomic::Ordering};

use self::recorder::SinkRecorder;

static CONTROLLER: OnceLock<Controller> = OnceLock::new();

/// Controller allows reading back the counters recorded through `metrics`.
#[derive(Debug)]
pub struct Controller {
    recorder: SinkRecorder,
}

/// Installs the process-wide recorder. Must be called once, before any event is emitted.
pub fn init_global() -> crate::Result<()> {
    let recorder = SinkRecorder::new_global();

    CONTROLLER
        .set(Controller {
            recorder: recorder.clone(),
        })
        .map_err(|_| "controller already initialized")?;
    metrics::set_global_recorder(recorder).map_err(|_| "recorder already initialized")?;

    Ok(())
}

/// Installs a recorder whose registry is local to the calling thread, and clears it.
///
/// Tests each run on their own thread, so counters read back only reflect the current test.
#[cfg(test)]
pub fn init_test() {
    CONTROLLER.get_or_init(|| {
        let recorder = SinkRecorder::ThreadLocal;
        // Nothing but this function installs a recorder in test builds.
        let _ = metrics::set_global_recorder(recorder.clone());
        Controller { recorder }
    });
    SinkRecorder::new_test();
}

/// Get a handle to the globally registered controller, if it's initialized.
pub fn get_controller() -> crate::Result<&'static Controller> {
    CONTROLLER
        .get()
        .ok_or_else(|| "metrics system not initialized".into())
}

impl Controller {
    /// Returns the value of the counter `name`, summed over all of its label sets.
    pub fn counter(&self, name: &str) -> u64 {
        self.recorder.with_registry(|registry| {
            let mut total = 0;
            registry.visit_counters(|key, counter| {
                if key.name() == name {
                    total += counter.load(Ordering::Relaxed);
                }
            });
            total
        })
    }
}
