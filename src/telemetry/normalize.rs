use chrono::DateTime;
use indexmap::IndexMap;
use thiserror::Error;

use crate::telemetry::{Measurement, MetricKind, RawReading, SensorPayload, Timestamp};

/// Serial-to-display-name lookup, rebuilt from inventory every poll cycle.
pub type NameTable = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampMode {
    /// Parse the upstream ISO-8601 timestamp into Unix epoch seconds.
    #[default]
    Epoch,
    /// Keep the upstream string verbatim. Debug output only.
    Raw,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no name known for serial {serial}")]
    MissingName { serial: String },

    #[error("unknown metric kind: {kind}")]
    UnknownKind { kind: String },

    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload { kind: MetricKind, reason: String },
}

/// Converts one raw reading into a canonical [`Measurement`]. Errors are
/// per-record; callers drop the record and continue.
pub fn normalize(
    raw: &RawReading,
    names: &NameTable,
    mode: TimestampMode,
) -> Result<Measurement, NormalizeError> {
    let name = names
        .get(&raw.serial)
        .ok_or_else(|| NormalizeError::MissingName {
            serial: raw.serial.clone(),
        })?;

    let kind: MetricKind = raw
        .metric
        .parse()
        .map_err(|_| NormalizeError::UnknownKind {
            kind: raw.metric.clone(),
        })?;

    let nested = raw
        .payload
        .get(kind.as_str())
        .ok_or_else(|| NormalizeError::MalformedPayload {
            kind,
            reason: format!("missing `{}` object", kind.as_str()),
        })?;

    let payload =
        SensorPayload::decode(kind, nested).map_err(|e| NormalizeError::MalformedPayload {
            kind,
            reason: e.to_string(),
        })?;

    let timestamp = match mode {
        TimestampMode::Raw => Timestamp::Raw(raw.ts.clone()),
        TimestampMode::Epoch => {
            let parsed = DateTime::parse_from_rfc3339(&raw.ts).map_err(|e| {
                NormalizeError::MalformedPayload {
                    kind,
                    reason: format!("unparseable timestamp {:?}: {e}", raw.ts),
                }
            })?;
            Timestamp::Epoch(parsed.timestamp())
        }
    };

    Ok(Measurement {
        metric: kind,
        network_id: raw.network.id.clone(),
        serial: raw.serial.clone(),
        name: name.clone(),
        timestamp,
        value: payload.value(),
    })
}

/// Normalizes a whole batch, logging and dropping failed records. Output
/// order follows input order.
pub fn normalize_batch(
    readings: &[RawReading],
    names: &NameTable,
    mode: TimestampMode,
) -> Vec<Measurement> {
    let mut measurements = Vec::with_capacity(readings.len());

    for raw in readings {
        match normalize(raw, names, mode) {
            Ok(m) => measurements.push(m),
            Err(err) => log::error!("dropping reading from {}: {err}", raw.serial),
        }
    }

    measurements
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::telemetry::MetricValue;

    const TS: &str = "2023-11-14T22:13:20Z";
    const TS_EPOCH: i64 = 1_700_000_000;

    fn names() -> NameTable {
        [
            ("Q2XX-1111".to_string(), "Lobby".to_string()),
            ("Q2XX-2222".to_string(), "Front Door".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn reading(metric: &str, payload: serde_json::Value) -> RawReading {
        serde_json::from_value(json!({
            "serial": "Q2XX-1111",
            "network": { "id": "N1" },
            "metric": metric,
            "ts": TS,
            metric: payload,
        }))
        .unwrap()
    }

    fn value_of(metric: &str, payload: serde_json::Value) -> MetricValue {
        normalize(&reading(metric, payload), &names(), TimestampMode::Epoch)
            .unwrap()
            .value
    }

    #[test]
    fn extracts_float_kinds_identity() {
        assert_eq!(
            value_of("temperature", json!({ "fahrenheit": 70.5 })),
            MetricValue::Float(70.5)
        );
        assert_eq!(
            value_of("humidity", json!({ "relativePercentage": 43.0 })),
            MetricValue::Float(43.0)
        );
        assert_eq!(
            value_of("tvoc", json!({ "concentration": 312.0 })),
            MetricValue::Float(312.0)
        );
        assert_eq!(
            value_of("eco2", json!({ "concentration": 410.0 })),
            MetricValue::Float(410.0)
        );
        assert_eq!(
            value_of("pm25", json!({ "concentration": 6.0 })),
            MetricValue::Float(6.0)
        );
        assert_eq!(
            value_of("noise", json!({ "ambient": { "level": 38.5 } })),
            MetricValue::Float(38.5)
        );
        assert_eq!(
            value_of("indoorAirQuality", json!({ "score": 92.0 })),
            MetricValue::Float(92.0)
        );
        assert_eq!(
            value_of("battery", json!({ "percentage": 87.0 })),
            MetricValue::Float(87.0)
        );
    }

    #[test]
    fn maps_boolean_kinds_to_one_and_zero() {
        assert_eq!(
            value_of("door", json!({ "open": true })),
            MetricValue::Integer(1)
        );
        assert_eq!(
            value_of("door", json!({ "open": false })),
            MetricValue::Integer(0)
        );
        assert_eq!(
            value_of("water", json!({ "present": true })),
            MetricValue::Integer(1)
        );
        assert_eq!(
            value_of("water", json!({ "present": false })),
            MetricValue::Integer(0)
        );
    }

    #[test]
    fn maps_button_press_types() {
        assert_eq!(
            value_of("button", json!({ "pressType": "short" })),
            MetricValue::Integer(1)
        );
        assert_eq!(
            value_of("button", json!({ "pressType": "long" })),
            MetricValue::Integer(2)
        );
        assert_eq!(
            value_of("button", json!({ "pressType": "held" })),
            MetricValue::Integer(0)
        );
        assert_eq!(
            value_of("button", json!({ "pressType": "" })),
            MetricValue::Integer(0)
        );
    }

    #[test]
    fn parses_timestamp_to_epoch_seconds() {
        let m = normalize(
            &reading("door", json!({ "open": true })),
            &names(),
            TimestampMode::Epoch,
        )
        .unwrap();
        assert_eq!(m.timestamp, Timestamp::Epoch(TS_EPOCH));
    }

    #[test]
    fn raw_mode_keeps_timestamp_verbatim() {
        let m = normalize(
            &reading("door", json!({ "open": true })),
            &names(),
            TimestampMode::Raw,
        )
        .unwrap();
        assert_eq!(m.timestamp, Timestamp::Raw(TS.to_string()));
    }

    #[test]
    fn resolves_display_name_unescaped() {
        let mut raw = reading("door", json!({ "open": true }));
        raw.serial = "Q2XX-2222".to_string();

        let m = normalize(&raw, &names(), TimestampMode::Epoch).unwrap();
        assert_eq!(m.name, "Front Door");
        assert_eq!(m.network_id, "N1");
        assert_eq!(m.serial, "Q2XX-2222");
    }

    #[test]
    fn missing_name_fails_regardless_of_kind() {
        let mut raw = reading("temperature", json!({ "fahrenheit": 70.5 }));
        raw.serial = "Q2XX-9999".to_string();

        let err = normalize(&raw, &names(), TimestampMode::Epoch).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingName { serial } if serial == "Q2XX-9999"));

        let mut raw = reading("bogus", json!({}));
        raw.serial = "Q2XX-9999".to_string();

        let err = normalize(&raw, &names(), TimestampMode::Epoch).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingName { .. }));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = normalize(&reading("co2", json!({})), &names(), TimestampMode::Epoch).unwrap_err();
        assert!(matches!(err, NormalizeError::UnknownKind { kind } if kind == "co2"));
    }

    #[test]
    fn missing_nested_object_is_malformed() {
        let raw: RawReading = serde_json::from_value(json!({
            "serial": "Q2XX-1111",
            "network": { "id": "N1" },
            "metric": "door",
            "ts": TS,
        }))
        .unwrap();

        let err = normalize(&raw, &names(), TimestampMode::Epoch).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MalformedPayload {
                kind: MetricKind::Door,
                ..
            }
        ));
    }

    #[test]
    fn mistyped_field_is_malformed() {
        let err = normalize(
            &reading("door", json!({ "open": "yes" })),
            &names(),
            TimestampMode::Epoch,
        )
        .unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedPayload { .. }));
    }

    #[test]
    fn unparseable_timestamp_is_malformed() {
        let mut raw = reading("door", json!({ "open": true }));
        raw.ts = "yesterday".to_string();

        let err = normalize(&raw, &names(), TimestampMode::Epoch).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedPayload { .. }));
    }

    #[test]
    fn batch_drops_failures_and_preserves_order() {
        let readings = vec![
            reading("door", json!({ "open": true })),
            reading("co2", json!({})),
            reading("temperature", json!({ "fahrenheit": 70.5 })),
            reading("water", json!({ "present": "wet" })),
            reading("battery", json!({ "percentage": 87.0 })),
        ];

        let measurements = normalize_batch(&readings, &names(), TimestampMode::Epoch);
        let kinds: Vec<MetricKind> = measurements.iter().map(|m| m.metric).collect();
        assert_eq!(
            kinds,
            [
                MetricKind::Door,
                MetricKind::Temperature,
                MetricKind::Battery
            ]
        );

        let encoded = crate::line_protocol::encode(&measurements);
        assert_eq!(encoded.lines().count(), 3);
        assert!(!encoded.contains("co2"));
        assert!(!encoded.contains("water"));
    }
}
