mod prelude;

pub use self::prelude::{error_stage, error_type};

pub trait InternalEvent: Sized {
    fn emit(self);
}

#[doc(hidden)]
pub fn emit(event: impl InternalEvent) {
    event.emit();
}

#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::internal_events::emit($event)
    };
}

// These use `emit!`, so they come after the macro.
mod component_events_dropped;
mod decoder;
mod process;
mod timestream;

pub use self::component_events_dropped::ComponentEventsDropped;
pub use self::decoder::*;
pub use self::process::*;
pub use self::timestream::*;
