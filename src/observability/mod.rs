//! Observability for the conversion layer
//!
//! Structured JSON logging of schema lifecycle events and conversion
//! failures. Logging is read-only: it never changes a conversion result.
//! Output is off until `set_enabled(true)`.

mod events;
mod logger;

pub use events::Event;
pub use logger::{is_enabled, set_enabled, Logger, Severity};

fn severity_for(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Warn
    } else if event.is_hot_path() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
