#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use typebus::{ListenerHandle, on};

// ============================================================================
// Test Value Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct UserJoined {
    pub id: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UserLeft {
    pub id: u64,
}

// ============================================================================
// Test Listeners
// ============================================================================

/// Shared log of `(label, value)` pairs, for ordering assertions.
pub type Log = Arc<Mutex<Vec<(&'static str, String)>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// A `String` listener appending `(label, value)` to `log`.
pub fn logged(label: &'static str, log: &Log) -> ListenerHandle {
    let log = log.clone();
    on::<String>(move |value: &String| {
        log.lock().unwrap().push((label, value.clone()));
    })
}

pub fn labels(log: &Log) -> Vec<&'static str> {
    log.lock().unwrap().iter().map(|(label, _)| *label).collect()
}
