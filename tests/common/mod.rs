//! Shared helpers: a recording log sink and request builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tsulog::Request;
use tsulog::sink::{FieldValue, Fields, LogSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct Event {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl Event {
    pub fn field(&self, key: &str) -> &FieldValue {
        self.fields
            .get(key)
            .unwrap_or_else(|| panic!("event {:?} has no field {key}: {}", self.message, self.fields))
    }

    pub fn str(&self, key: &str) -> &str {
        self.field(key).as_str().unwrap_or_else(|| panic!("field {key} is not a string"))
    }

    pub fn u64(&self, key: &str) -> u64 {
        self.field(key).as_u64().unwrap_or_else(|| panic!("field {key} is not a number"))
    }
}

/// Records every event it receives. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.events().iter().map(|e| e.level).collect()
    }

    /// The single event at `level`; fails if there are zero or several.
    pub fn only(&self, level: Level) -> Event {
        let mut matching: Vec<_> = self.events().into_iter().filter(|e| e.level == level).collect();
        assert_eq!(matching.len(), 1, "expected exactly one {level:?} event, got {matching:?}");
        matching.remove(0)
    }

    fn push(&self, level: Level, message: &str, fields: &Fields) {
        self.events.lock().unwrap().push(Event {
            level,
            message: message.to_owned(),
            fields: fields.clone(),
        });
    }
}

impl LogSink for RecordingSink {
    fn debug(&self, message: &str, fields: &Fields) { self.push(Level::Debug, message, fields) }
    fn info(&self, message: &str, fields: &Fields) { self.push(Level::Info, message, fields) }
    fn error(&self, message: &str, fields: &Fields) { self.push(Level::Error, message, fields) }
}

pub fn request(method: &str, uri: &str, headers: &[(&str, &str)], body: &'static str) -> Request {
    request_from(method, uri, headers, body, "9.9.9.9:54321")
}

pub fn request_from(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &'static str,
    peer: &str,
) -> Request {
    let mut builder = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    Request::from_http(builder.body(Bytes::from_static(body.as_bytes())).unwrap(), peer.parse().unwrap())
}
