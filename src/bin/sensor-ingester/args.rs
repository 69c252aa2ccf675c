use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "MERAKI_DASHBOARD_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "MERAKI_ORG_ID")]
    pub organization_id: String,

    #[arg(long, default_value = "https://api.meraki.com/api/v1")]
    pub api_base_url: String,

    #[arg(long, env = "DB_HOST")]
    pub db_host: String,

    #[arg(long, default_value_t = 8086)]
    pub db_port: u16,

    #[arg(long, env = "DB_NAME", default_value = "metrics")]
    pub db_name: String,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    pub db_pass: Option<String>,

    /// Seconds to sleep between poll cycles.
    #[arg(long, default_value_t = 10)]
    pub interval_secs: u64,

    /// Lookback window passed to the readings API, in seconds.
    #[arg(long, default_value_t = 1800)]
    pub timespan_secs: u64,

    #[arg(long, default_value = "./.pid")]
    pub pid_file: PathBuf,

    /// Print encoded batches to stdout (with raw timestamps) instead of
    /// writing to the database.
    #[arg(long)]
    pub debug: bool,
}
