use crate::telemetry::Measurement;

/// Serializes a batch of measurements into InfluxDB line protocol:
/// `<kind>,network=<net>,serial=<sn>,sensorName=<name> <kind>=<value> <ts>`.
/// Lines are joined with a single newline, no trailing newline.
pub fn encode(measurements: &[Measurement]) -> String {
    measurements
        .iter()
        .map(encode_line)
        .collect::<Vec<String>>()
        .join("\n")
}

fn encode_line(m: &Measurement) -> String {
    let kind = m.metric.as_str();
    format!(
        "{kind},network={},serial={},sensorName={} {kind}={} {}",
        m.network_id,
        m.serial,
        escape_spaces(&m.name),
        m.value,
        m.timestamp,
    )
}

// Line protocol requires spaces in tag values to be escaped; nothing else in
// a sensor name needs it.
fn escape_spaces(name: &str) -> String {
    name.replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{Measurement, MetricKind, MetricValue, Timestamp};

    fn measurement() -> Measurement {
        Measurement {
            metric: MetricKind::Door,
            network_id: "N1".to_string(),
            serial: "Q2XX-1111".to_string(),
            name: "Lobby".to_string(),
            timestamp: Timestamp::Epoch(1_700_000_000),
            value: MetricValue::Integer(1),
        }
    }

    #[test]
    fn empty_batch_encodes_to_empty_string() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn encodes_single_measurement_byte_exact() {
        assert_eq!(
            encode(&[measurement()]),
            "door,network=N1,serial=Q2XX-1111,sensorName=Lobby door=1 1700000000"
        );
    }

    #[test]
    fn escapes_spaces_in_sensor_name() {
        let mut m = measurement();
        m.name = "Front Door".to_string();

        let encoded = encode(&[m]);
        assert!(encoded.contains("sensorName=Front\\ Door"));
        assert_eq!(
            encoded,
            "door,network=N1,serial=Q2XX-1111,sensorName=Front\\ Door door=1 1700000000"
        );
    }

    #[test]
    fn encodes_float_values_and_joins_with_newlines() {
        let mut second = measurement();
        second.metric = MetricKind::Temperature;
        second.value = MetricValue::Float(70.5);

        let encoded = encode(&[measurement(), second]);
        let lines: Vec<&str> = encoded.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "temperature,network=N1,serial=Q2XX-1111,sensorName=Lobby temperature=70.5 1700000000"
        );
        assert!(!encoded.ends_with('\n'));
    }

    #[test]
    fn raw_timestamp_passes_through() {
        let mut m = measurement();
        m.timestamp = Timestamp::Raw("2023-11-14T22:13:20Z".to_string());

        assert!(encode(&[m]).ends_with(" 2023-11-14T22:13:20Z"));
    }
}
