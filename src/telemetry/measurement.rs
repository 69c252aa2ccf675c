use std::fmt;

use crate::telemetry::MetricKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// `Raw` keeps the upstream ISO-8601 string verbatim and exists for the
/// debug output path only; the production sink requires epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Epoch(i64),
    Raw(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Epoch(secs) => write!(f, "{secs}"),
            Timestamp::Raw(ts) => f.write_str(ts),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Measurement {
    pub metric: MetricKind,

    pub network_id: String,

    pub serial: String,

    /// Display name as resolved from inventory, unescaped.
    pub name: String,

    pub timestamp: Timestamp,

    pub value: MetricValue,
}
