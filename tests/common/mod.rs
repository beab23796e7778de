// Shared test helpers for integration tests
#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use suite_runner::{Event, EventContext, EventKind, Issue, IssueKind, TestId};

/// A writer whose clones all append to the same buffer, so a test can keep
/// one handle while a recorder owns another.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Every event and context a recorder received, in order.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<(Event, EventContext)>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: &Event, context: &EventContext) {
        self.0.lock().unwrap().push((event.clone(), context.clone()));
    }

    pub fn events(&self) -> Vec<(Event, EventContext)> {
        self.0.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(|(event, _)| event.kind.name()).collect()
    }
}

pub fn test_id(path: &str) -> TestId {
    TestId::new(path.split('.'))
}

pub fn issue_event(is_known: bool) -> Event {
    let issue = Issue::new(IssueKind::ExpectationFailed, "expected true, got false");
    let issue = if is_known { issue.known() } else { issue };
    Event::new(EventKind::IssueRecorded { issue })
}
