//! The logging capability the middleware writes to.
//!
//! The middleware never formats or ships log lines itself. It builds a
//! message plus an ordered list of key/value [`Fields`] and hands both to a
//! [`LogSink`]. [`TracingSink`] forwards to `tracing`; tests plug in a sink
//! that records events.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};

/// A structured logger with three levels.
///
/// Implementations must be safe to call from many requests at once.
pub trait LogSink: Send + Sync + 'static {
    fn debug(&self, message: &str, fields: &Fields);
    fn info(&self, message: &str, fields: &Fields);
    fn error(&self, message: &str, fields: &Fields);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn debug(&self, message: &str, fields: &Fields) { (**self).debug(message, fields) }
    fn info(&self, message: &str, fields: &Fields) { (**self).info(message, fields) }
    fn error(&self, message: &str, fields: &Fields) { (**self).error(message, fields) }
}

// ── Fields ────────────────────────────────────────────────────────────────────

/// Ordered key/value context attached to a log event.
///
/// Insertion order is preserved and is the order a sink renders them in.
///
/// ```rust
/// use std::time::Duration;
/// use tsulog::sink::Fields;
///
/// let fields = Fields::new()
///     .with("path", "/users")
///     .with("status", 200u16)
///     .with("time", Duration::from_millis(3));
/// assert_eq!(fields.to_string(), "path=/users status=200 time=3ms");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(Vec<(&'static str, FieldValue)>);

impl Fields {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, key: &'static str, value: impl Into<FieldValue>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    /// First value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// logfmt-style: `key=value key="value with spaces"`.
impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}=")?;
            let rendered = value.to_string();
            if rendered.is_empty() || rendered.contains(|c: char| c.is_whitespace() || c == '"' || c == '=') {
                write!(f, "{rendered:?}")?;
            } else {
                f.write_str(&rendered)?;
            }
        }
        Ok(())
    }
}

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Duration(Duration),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(n) => Some(*n),
            Self::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s)      => f.write_str(s),
            Self::Int(n)      => write!(f, "{n}"),
            Self::Uint(n)     => write!(f, "{n}"),
            Self::Duration(d) => write!(f, "{d:?}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { Self::Str(v.to_owned()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { Self::Str(v) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { Self::Int(v) }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self { Self::Uint(u64::from(v)) }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self { Self::Uint(v) }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self { Self::Uint(v as u64) }
}

impl From<Duration> for FieldValue {
    fn from(v: Duration) -> Self { Self::Duration(v) }
}

impl From<StatusCode> for FieldValue {
    fn from(v: StatusCode) -> Self { Self::Uint(u64::from(v.as_u16())) }
}

impl From<&Method> for FieldValue {
    fn from(v: &Method) -> Self { Self::Str(v.as_str().to_owned()) }
}

// ── TracingSink ───────────────────────────────────────────────────────────────

/// A [`LogSink`] that emits `tracing` events under the `tsulog` target.
///
/// The fields are rendered logfmt-style into a single `fields` value, since
/// `tracing` field names must be known at compile time.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn debug(&self, message: &str, fields: &Fields) {
        tracing::debug!(target: "tsulog", %fields, "{message}");
    }

    fn info(&self, message: &str, fields: &Fields) {
        tracing::info!(target: "tsulog", %fields, "{message}");
    }

    fn error(&self, message: &str, fields: &Fields) {
        tracing::error!(target: "tsulog", %fields, "{message}");
    }
}
