use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::rate::{FetchError, Rate, RateProvider};

const EUR_RATE_PATH: &str = "/api/exchangerates/rates/A/EUR/last";

// NbpRateProvider fetches the latest EUR mid rate from NBP table A
pub struct NbpRateProvider {
    base_url: String,
}

impl NbpRateProvider {
    pub fn new(base_url: &str) -> Self {
        NbpRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}?format=json", self.base_url, EUR_RATE_PATH)
    }

    fn parse_api_date(date_str: &str) -> Result<NaiveDate, FetchError> {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| FetchError::Malformed(format!("invalid effectiveDate {date_str}: {e}")))
    }

    fn parse_response(text: &str) -> Result<Rate, FetchError> {
        let data: NbpRateResponse = serde_json::from_str(text)
            .map_err(|e| FetchError::Malformed(format!("Failed to parse JSON response: {e}")))?;

        let code = data.code;
        let item = data
            .rates
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::Malformed("No rate data found for EUR".to_string()))?;
        debug!(code = ?code, table = ?item.no, "Parsed NBP table entry");

        let effective_date = Self::parse_api_date(&item.effective_date)?;
        Rate::new(item.mid, effective_date)
    }
}

#[derive(Debug, Deserialize)]
struct NbpRateResponse {
    #[serde(default)]
    code: Option<String>,
    rates: Vec<NbpRateItem>,
}

#[derive(Debug, Deserialize)]
struct NbpRateItem {
    #[serde(default)]
    no: Option<String>,
    #[serde(rename = "effectiveDate")]
    effective_date: String,
    mid: f64,
}

#[async_trait]
impl RateProvider for NbpRateProvider {
    #[instrument(name = "NbpRateFetch", skip(self))]
    async fn fetch_rate(&self) -> Result<Rate, FetchError> {
        let url = self.url();
        debug!("Requesting EUR rate from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("kurs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("{e} URL: {url}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let rate = Self::parse_response(&text)?;
        debug!(mid = rate.mid, effective_date = %rate.effective_date, "Received NBP rate");
        Ok(rate)
    }
}
