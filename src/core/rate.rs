//! Exchange rate abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A published mid rate: how many PLN one EUR is worth on `effective_date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub mid: f64,
    pub effective_date: NaiveDate,
}

impl Rate {
    /// Builds a rate, rejecting values that cannot be inverted or multiplied.
    pub fn new(mid: f64, effective_date: NaiveDate) -> Result<Self, FetchError> {
        if !mid.is_finite() || mid <= 0.0 {
            return Err(FetchError::Malformed(format!(
                "mid rate must be a positive number, got {mid}"
            )));
        }
        Ok(Self {
            mid,
            effective_date,
        })
    }
}

/// Failure to obtain a rate. Every variant is a fetch failure; the variant
/// only names the cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Transport(String),
    #[error("HTTP error: {0}")]
    Status(String),
    #[error("Malformed rate payload: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self) -> Result<Rate, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    #[test]
    fn test_rate_accepts_positive_mid() {
        let rate = Rate::new(4.321, date()).unwrap();
        assert_eq!(rate.mid, 4.321);
        assert_eq!(rate.effective_date, date());
    }

    #[test]
    fn test_rate_rejects_unusable_mid() {
        for mid in [0.0, -4.3, f64::NAN, f64::INFINITY] {
            let err = Rate::new(mid, date()).unwrap_err();
            assert!(matches!(err, FetchError::Malformed(_)), "mid {mid}");
        }
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(
            FetchError::Status("500 Internal Server Error".to_string()).to_string(),
            "HTTP error: 500 Internal Server Error"
        );
        assert_eq!(
            FetchError::Transport("connection refused".to_string()).to_string(),
            "Request error: connection refused"
        );
    }
}
