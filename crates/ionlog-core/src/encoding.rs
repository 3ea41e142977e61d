//! JSON line encoding
//!
//! One record becomes one JSON object terminated by `\n`. Static fields come
//! first, followed by the fixed fields; a static field that reuses a fixed
//! key is overwritten by the fixed value.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Level, LogRecord};
use crate::error::SinkResult;

/// Extra key/value pairs attached to every record
pub type StaticFields = BTreeMap<String, String>;

/// Fixed keys every line carries
pub const FIXED_KEYS: [&str; 7] = ["time", "level", "msg", "file", "package", "function", "line"];

/// Serialize a record into a single newline-terminated JSON line
pub fn encode_record(record: &LogRecord, static_fields: &StaticFields) -> SinkResult<Vec<u8>> {
    let mut object = Map::with_capacity(static_fields.len() + FIXED_KEYS.len());

    for (key, value) in static_fields {
        object.insert(key.clone(), Value::String(value.clone()));
    }

    object.insert(
        "time".into(),
        record
            .timestamp
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
            .into(),
    );
    object.insert("level".into(), record.level.as_str().into());
    object.insert("msg".into(), record.message.clone().into());
    object.insert("file".into(), record.caller.file.clone().into());
    object.insert("package".into(), record.caller.package.clone().into());
    object.insert("function".into(), record.caller.function.clone().into());
    object.insert("line".into(), record.caller.line.to_string().into());

    let mut buf = serde_json::to_vec(&Value::Object(object))?;
    buf.push(b'\n');
    Ok(buf)
}

/// A decoded log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub msg: String,
    pub file: String,
    pub package: String,
    pub function: String,
    /// Source line, kept as the string written on disk
    pub line: String,
    /// Static fields and anything else on the line
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LogLine {
    /// Parse one serialized line; surrounding whitespace is ignored
    pub fn parse(bytes: &[u8]) -> SinkResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Source line as a number, if it is one
    pub fn line_number(&self) -> Option<u32> {
        self.line.parse().ok()
    }
}
