//! BYMA cauciones REST client.
//!
//! Fetches the free cauciones board from BYMA's public data API and
//! decodes it leniently: malformed rows are skipped with a debug log,
//! only a non-array response body is an error.

use crate::error::FeedError;
use compact_str::CompactString;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// BYMA free-API cauciones endpoint.
const CAUCIONES_URL: &str =
    "https://open.bymadata.com.ar/vanoms-be-core/rest/api/bymadata/free/cauciones";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; bym-alert/1.0)";

/// Feed client configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Verify the endpoint's TLS certificate chain. The free API has
    /// served an incomplete chain for years, so this is off unless
    /// `BYMA_VERIFY_SSL=true`.
    pub verify_tls: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            verify_tls: false,
        }
    }
}

impl FeedConfig {
    /// Read the TLS toggle from the environment (`BYMA_VERIFY_SSL`).
    pub fn from_env() -> Self {
        let verify_tls = std::env::var("BYMA_VERIFY_SSL")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            verify_tls,
            ..Self::default()
        }
    }
}

/// One market row from the cauciones board.
///
/// Every field is optional on the wire. Rows missing what the selector
/// needs are skipped there, not here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaucionRow {
    /// Currency code (`ARS`, `USD`). The live API calls this
    /// `denominationCcy`; older captures spell it out.
    #[serde(default, alias = "denominationCurrency")]
    pub denomination_ccy: Option<CompactString>,
    /// Days until settlement.
    #[serde(default)]
    pub days_to_maturity: Option<i64>,
    /// Annualized rate in percent. Missing reads as zero.
    #[serde(default)]
    pub settlement_price: f64,
    /// Settlement date, `YYYY-MM-DD`.
    #[serde(default)]
    pub maturity_date: Option<String>,
}

/// Decode a raw response body into rows.
///
/// The body must be a JSON array; rows that fail to decode individually
/// are dropped and counted.
pub fn rows_from_value(value: serde_json::Value) -> Result<Vec<CaucionRow>, FeedError> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(FeedError::UnexpectedShape(format!(
                "expected an array of rows, got {}",
                json_type_name(&other)
            )))
        }
    };

    let total = items.len();
    let rows: Vec<CaucionRow> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if rows.len() < total {
        debug!(
            skipped = total - rows.len(),
            total = total,
            "Skipped undecodable cauciones rows"
        );
    }

    Ok(rows)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// REST client for the BYMA cauciones board.
pub struct BymaClient {
    client: reqwest::Client,
}

impl BymaClient {
    /// Build a client from feed configuration.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the current cauciones board.
    ///
    /// The endpoint wants a browser-shaped POST: JSON body with the
    /// `excludeZeroPxAndQty` flag plus Origin/Referer headers.
    pub async fn fetch_cauciones(&self) -> Result<Vec<CaucionRow>, FeedError> {
        debug!("Fetching cauciones board");

        let response = self
            .client
            .post(CAUCIONES_URL)
            .header("Content-Type", "application/json")
            .header("Origin", "https://open.bymadata.com.ar")
            .header("Referer", "https://open.bymadata.com.ar/")
            .header("User-Agent", USER_AGENT)
            .json(&serde_json::json!({ "excludeZeroPxAndQty": true }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let value: serde_json::Value = response.json().await?;
        let rows = rows_from_value(value)?;
        debug!(rows = rows.len(), "Fetched cauciones board");
        Ok(rows)
    }
}
