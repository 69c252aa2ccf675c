use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Door,
    Temperature,
    Humidity,
    Tvoc,
    Eco2,
    Pm25,
    Noise,
    Water,
    IndoorAirQuality,
    Button,
    Battery,
}

impl MetricKind {
    pub const ALL: [MetricKind; 11] = [
        MetricKind::Door,
        MetricKind::Temperature,
        MetricKind::Humidity,
        MetricKind::Tvoc,
        MetricKind::Eco2,
        MetricKind::Pm25,
        MetricKind::Noise,
        MetricKind::Water,
        MetricKind::IndoorAirQuality,
        MetricKind::Button,
        MetricKind::Battery,
    ];

    /// The tag the readings API uses for this kind, also the measurement
    /// name in the encoded output.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Door => "door",
            MetricKind::Temperature => "temperature",
            MetricKind::Humidity => "humidity",
            MetricKind::Tvoc => "tvoc",
            MetricKind::Eco2 => "eco2",
            MetricKind::Pm25 => "pm25",
            MetricKind::Noise => "noise",
            MetricKind::Water => "water",
            MetricKind::IndoorAirQuality => "indoorAirQuality",
            MetricKind::Button => "button",
            MetricKind::Battery => "battery",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "door" => Ok(MetricKind::Door),
            "temperature" => Ok(MetricKind::Temperature),
            "humidity" => Ok(MetricKind::Humidity),
            "tvoc" => Ok(MetricKind::Tvoc),
            "eco2" => Ok(MetricKind::Eco2),
            "pm25" => Ok(MetricKind::Pm25),
            "noise" => Ok(MetricKind::Noise),
            "water" => Ok(MetricKind::Water),
            "indoorAirQuality" => Ok(MetricKind::IndoorAirQuality),
            "button" => Ok(MetricKind::Button),
            "battery" => Ok(MetricKind::Battery),
            _ => bail!("unknown metric kind: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_kind() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>().unwrap(), kind);
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!("co2".parse::<MetricKind>().is_err());
        assert!("".parse::<MetricKind>().is_err());
        assert!("Door".parse::<MetricKind>().is_err());
    }
}
