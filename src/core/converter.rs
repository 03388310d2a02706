//! The rendering boundary: one rate source plus one conversion panel,
//! exposed as plain data and a handful of user actions.

use crate::core::history::ConversionEntry;
use crate::core::panel::{ConversionPanel, Direction};
use crate::core::rate::RateProvider;
use crate::providers::caching::CachingRateProvider;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};

/// Everything a presentation layer needs to draw the converter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConverterView {
    /// Effective rate for the current direction, rounded to 4 places.
    pub rate: Option<f64>,
    /// Raw NBP mid rate (PLN per EUR).
    pub mid: Option<f64>,
    pub effective_date: Option<NaiveDate>,
    /// When the shown rate was received.
    pub fetched_at: Option<DateTime<Utc>>,
    pub direction: Direction,
    pub base_code: &'static str,
    pub quote_code: &'static str,
    pub is_loading: bool,
    pub is_refetching: bool,
    pub error: Option<String>,
    pub amount: String,
    pub preview: Option<f64>,
    pub history: Vec<ConversionEntry>,
}

pub struct Converter<P: RateProvider + 'static> {
    rates: CachingRateProvider<P>,
    panel: ConversionPanel,
}

impl<P: RateProvider + 'static> Converter<P> {
    pub fn new(provider: P, direction: Direction) -> Self {
        Self {
            rates: CachingRateProvider::new(provider),
            panel: ConversionPanel::new(direction),
        }
    }

    /// Initial load. Served from cache when a rate is already present.
    pub async fn mount(&self) {
        if let Err(e) = self.rates.fetch_rate().await {
            warn!(error = %e, "Initial rate fetch failed");
        }
    }

    /// User-triggered refresh; the only recovery path after a failure.
    pub async fn refetch(&self) {
        if let Err(e) = self.rates.refetch().await {
            warn!(error = %e, "Rate refetch failed");
        }
    }

    pub async fn toggle_direction(&mut self) -> bool {
        let rate = self.rates.current().await;
        let changed = self.panel.toggle_direction(rate.as_ref());
        debug!(changed, direction = %self.panel.direction(), "Toggle direction");
        changed
    }

    pub fn set_amount(&mut self, text: &str) {
        self.panel.set_amount(text);
    }

    pub fn clear_amount(&mut self) {
        self.panel.clear_amount();
    }

    pub async fn commit_conversion(&mut self) -> Option<ConversionEntry> {
        let rate = self.rates.current().await;
        let entry = self.panel.commit_pending(rate.as_ref());
        if let Some(entry) = &entry {
            debug!(id = %entry.id, amount = entry.amount, result = entry.result, "Committed conversion");
        }
        entry
    }

    pub async fn view(&self) -> ConverterView {
        let state = self.rates.state().await;
        let rate = state.data.as_ref();
        let direction = self.panel.direction();

        ConverterView {
            rate: rate.map(|r| self.panel.display_rate(r)),
            mid: rate.map(|r| r.mid),
            effective_date: rate.map(|r| r.effective_date),
            fetched_at: state.updated_at,
            direction,
            base_code: direction.base_code(),
            quote_code: direction.quote_code(),
            is_loading: state.is_fetching && rate.is_none(),
            is_refetching: state.is_fetching && rate.is_some(),
            error: state.error.as_ref().map(|e| e.to_string()),
            amount: self.panel.amount().to_string(),
            preview: self.panel.preview(rate),
            history: self.panel.history().to_vec(),
        }
    }
}
