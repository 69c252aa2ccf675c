mod args;

use std::{fs, process::ExitCode};

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use sensor_fleet::{
    influx::{InfluxConfig, InfluxSink},
    line_protocol::encode,
    meraki::MerakiClient,
    telemetry::{TimestampMode, normalize_batch},
};
use tokio::time::{Duration, sleep};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    fs::write(&args.pid_file, std::process::id().to_string())
        .with_context(|| format!("failed to write PID file: {:?}", args.pid_file))?;

    log::info!("sensor-ingester started (pid {})", std::process::id());

    let client = MerakiClient::new(&args.api_base_url, &args.api_key, &args.organization_id)
        .context("failed to build Meraki client")?;

    let influx = InfluxConfig {
        host: args.db_host.clone(),
        port: args.db_port,
        database: args.db_name.clone(),
        username: args.db_user.clone(),
        password: args.db_pass.clone(),
    };

    let mode = if args.debug {
        TimestampMode::Raw
    } else {
        TimestampMode::Epoch
    };

    loop {
        poll_cycle(&args, &client, &influx, mode).await;
        sleep(Duration::from_secs(args.interval_secs)).await;
    }
}

/// One cycle: resolve names, fetch readings, normalize, encode, write.
/// Upstream failures log and skip the cycle; nothing here stops the loop.
async fn poll_cycle(args: &Args, client: &MerakiClient, influx: &InfluxConfig, mode: TimestampMode) {
    let names = match client.sensor_name_table().await {
        Ok(names) => names,
        Err(err) => {
            log::error!("unable to pull inventory: {err:#}");
            return;
        }
    };

    let readings = match client.sensor_readings_history(args.timespan_secs).await {
        Ok(readings) => readings,
        Err(err) => {
            log::error!("unable to pull sensor readings: {err:#}");
            return;
        }
    };

    let measurements = normalize_batch(&readings, &names, mode);
    let batch = encode(&measurements);

    if args.debug {
        println!("{batch}");
        return;
    }

    write_batch(influx, &batch).await;
}

// Mirrors the sink's stage order; a failed stage logs and skips the rest of
// this cycle's stages.
async fn write_batch(config: &InfluxConfig, batch: &str) {
    let sink = match InfluxSink::connect(config).await {
        Ok(sink) => sink,
        Err(err) => {
            log::error!("unable to connect to db: {err:#}");
            return;
        }
    };

    if let Err(err) = sink.select_database().await {
        log::error!("unable to select db: {err:#}");
        return;
    }

    if let Err(err) = sink.write_points(batch).await {
        log::error!("unable to write to db: {err:#}");
        return;
    }

    if let Err(err) = sink.close() {
        log::error!("unable to close db connection: {err:#}");
    }
}
