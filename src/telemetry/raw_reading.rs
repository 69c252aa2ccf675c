use serde::Deserialize;

use crate::telemetry::{MetricKind, MetricValue};

/// One sensor data point as returned by the readings API. The kind-specific
/// nested object sits under a key equal to the metric tag
/// (`{"metric": "door", "door": {"open": true}, ...}`), so it lands in the
/// flattened map and is decoded into a typed payload during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReading {
    pub serial: String,

    pub network: Network,

    pub metric: String,

    pub ts: String,

    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DoorPayload {
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct TemperaturePayload {
    pub fahrenheit: f64,
}

#[derive(Debug, Deserialize)]
pub struct HumidityPayload {
    #[serde(rename = "relativePercentage")]
    pub relative_percentage: f64,
}

/// Shared by tvoc, eco2, and pm25.
#[derive(Debug, Deserialize)]
pub struct ConcentrationPayload {
    pub concentration: f64,
}

#[derive(Debug, Deserialize)]
pub struct NoisePayload {
    pub ambient: NoiseAmbient,
}

#[derive(Debug, Deserialize)]
pub struct NoiseAmbient {
    pub level: f64,
}

#[derive(Debug, Deserialize)]
pub struct WaterPayload {
    pub present: bool,
}

#[derive(Debug, Deserialize)]
pub struct IndoorAirQualityPayload {
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct ButtonPayload {
    #[serde(rename = "pressType")]
    pub press_type: String,
}

#[derive(Debug, Deserialize)]
pub struct BatteryPayload {
    pub percentage: f64,
}

#[derive(Debug)]
pub enum SensorPayload {
    Door(DoorPayload),
    Temperature(TemperaturePayload),
    Humidity(HumidityPayload),
    Tvoc(ConcentrationPayload),
    Eco2(ConcentrationPayload),
    Pm25(ConcentrationPayload),
    Noise(NoisePayload),
    Water(WaterPayload),
    IndoorAirQuality(IndoorAirQualityPayload),
    Button(ButtonPayload),
    Battery(BatteryPayload),
}

impl SensorPayload {
    pub fn decode(kind: MetricKind, raw: &serde_json::Value) -> serde_json::Result<Self> {
        match kind {
            MetricKind::Door => decode_door(raw),
            MetricKind::Temperature => decode_temperature(raw),
            MetricKind::Humidity => decode_humidity(raw),
            MetricKind::Tvoc => decode_tvoc(raw),
            MetricKind::Eco2 => decode_eco2(raw),
            MetricKind::Pm25 => decode_pm25(raw),
            MetricKind::Noise => decode_noise(raw),
            MetricKind::Water => decode_water(raw),
            MetricKind::IndoorAirQuality => decode_indoor_air_quality(raw),
            MetricKind::Button => decode_button(raw),
            MetricKind::Battery => decode_battery(raw),
        }
    }

    pub fn value(&self) -> MetricValue {
        match self {
            SensorPayload::Door(p) => MetricValue::Integer(i64::from(p.open)),
            SensorPayload::Temperature(p) => MetricValue::Float(p.fahrenheit),
            SensorPayload::Humidity(p) => MetricValue::Float(p.relative_percentage),
            SensorPayload::Tvoc(p) => MetricValue::Float(p.concentration),
            SensorPayload::Eco2(p) => MetricValue::Float(p.concentration),
            SensorPayload::Pm25(p) => MetricValue::Float(p.concentration),
            SensorPayload::Noise(p) => MetricValue::Float(p.ambient.level),
            SensorPayload::Water(p) => MetricValue::Integer(i64::from(p.present)),
            SensorPayload::IndoorAirQuality(p) => MetricValue::Float(p.score),
            SensorPayload::Button(p) => MetricValue::Integer(match p.press_type.as_str() {
                "short" => 1,
                "long" => 2,
                _ => 0,
            }),
            SensorPayload::Battery(p) => MetricValue::Float(p.percentage),
        }
    }
}

fn decode_door(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Door(serde_json::from_value(raw.clone())?))
}

fn decode_temperature(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Temperature(serde_json::from_value(
        raw.clone(),
    )?))
}

fn decode_humidity(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Humidity(serde_json::from_value(
        raw.clone(),
    )?))
}

fn decode_tvoc(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Tvoc(serde_json::from_value(raw.clone())?))
}

fn decode_eco2(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Eco2(serde_json::from_value(raw.clone())?))
}

fn decode_pm25(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Pm25(serde_json::from_value(raw.clone())?))
}

fn decode_noise(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Noise(serde_json::from_value(raw.clone())?))
}

fn decode_water(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Water(serde_json::from_value(raw.clone())?))
}

fn decode_indoor_air_quality(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::IndoorAirQuality(serde_json::from_value(
        raw.clone(),
    )?))
}

fn decode_button(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Button(serde_json::from_value(raw.clone())?))
}

fn decode_battery(raw: &serde_json::Value) -> serde_json::Result<SensorPayload> {
    Ok(SensorPayload::Battery(serde_json::from_value(raw.clone())?))
}
