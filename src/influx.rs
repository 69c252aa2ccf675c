use anyhow::{Context as _, Result, bail};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// InfluxDB 1.x HTTP sink. Each stage (connect, select, write, close) is a
/// separate fallible call so the poll loop can log a failure and skip the
/// rest of the cycle.
#[derive(Debug)]
pub struct InfluxSink {
    http: Client,
    base_url: String,
    database: String,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    series: Vec<Series>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxSink {
    pub async fn connect(config: &InfluxConfig) -> Result<Self> {
        let base_url = format!("http://{}:{}", config.host, config.port);
        let http = Client::new();

        let response = http
            .get(format!("{base_url}/ping"))
            .send()
            .await
            .context("failed to reach InfluxDB")?;
        if !response.status().is_success() {
            bail!("InfluxDB ping returned {}", response.status());
        }

        Ok(Self {
            http,
            base_url,
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Verifies the configured database exists before anything is written.
    pub async fn select_database(&self) -> Result<()> {
        let request = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[("q", "SHOW DATABASES")]);

        let decoded: QueryResponse = self
            .authorize(request)
            .send()
            .await
            .context("failed to list databases")?
            .error_for_status()
            .context("SHOW DATABASES rejected")?
            .json()
            .await
            .context("failed to decode SHOW DATABASES response")?;

        let known = decoded
            .results
            .iter()
            .flat_map(|r| &r.series)
            .flat_map(|s| &s.values)
            .flatten()
            .any(|v| v.as_str() == Some(self.database.as_str()));
        if !known {
            bail!("database {:?} does not exist", self.database);
        }

        Ok(())
    }

    /// Writes a line-protocol batch with second precision.
    pub async fn write_points(&self, lines: &str) -> Result<()> {
        let request = self
            .http
            .post(format!("{}/write", self.base_url))
            .query(&[("db", self.database.as_str()), ("precision", "s")])
            .body(lines.to_string());

        let response = self
            .authorize(request)
            .send()
            .await
            .context("failed to write points")?;
        if !response.status().is_success() {
            bail!("write returned {}", response.status());
        }

        Ok(())
    }

    pub fn close(self) -> Result<()> {
        drop(self.http);
        Ok(())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_deref()),
            None => request,
        }
    }
}
