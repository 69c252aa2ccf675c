pub mod influx;
pub mod line_protocol;
pub mod meraki;
pub mod telemetry;
