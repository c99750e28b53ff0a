use std::sync::Mutex;

use fanfetch::report::{Event, Reporter};

/// Reporter that records every event so tests can assert on the run
/// without capturing process output.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<Event>>,
}

impl CollectingReporter {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl Reporter for CollectingReporter {
    fn event(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Outcome events only, in arrival order; spinner ticks and lifecycle
/// markers are filtered out.
pub fn outcomes(events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| matches!(e, Event::Finished { .. } | Event::Failed { .. }))
        .collect()
}
