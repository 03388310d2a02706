//! Conversion panel: display direction, amount input and history

use crate::core::history::{ConversionEntry, History};
use crate::core::rate::Rate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

/// Which currency is the base unit shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 1 EUR = x PLN
    #[default]
    EurToPln,
    /// 1 PLN = x EUR
    PlnToEur,
}

impl Direction {
    pub fn from_inverse(inverse: bool) -> Self {
        if inverse {
            Direction::PlnToEur
        } else {
            Direction::EurToPln
        }
    }

    pub fn is_inverse(&self) -> bool {
        *self == Direction::PlnToEur
    }

    pub fn toggled(&self) -> Self {
        Self::from_inverse(!self.is_inverse())
    }

    pub fn base_code(&self) -> &'static str {
        match self {
            Direction::EurToPln => "EUR",
            Direction::PlnToEur => "PLN",
        }
    }

    pub fn quote_code(&self) -> &'static str {
        match self {
            Direction::EurToPln => "PLN",
            Direction::PlnToEur => "EUR",
        }
    }

    pub fn base_name(&self) -> &'static str {
        match self {
            Direction::EurToPln => "Euro",
            Direction::PlnToEur => "Polish Zloty",
        }
    }

    /// Rate applied to an amount in the base currency.
    pub fn effective_rate(&self, rate: &Rate) -> f64 {
        match self {
            Direction::EurToPln => rate.mid,
            Direction::PlnToEur => 1.0 / rate.mid,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.base_code(), self.quote_code())
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    // No fractional digits left at this magnitude.
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Parses user input as a non-negative decimal. Accepts `,` as the decimal
/// separator.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let normalized = text.replacen(',', ".", 1);
    let amount = normalized.parse::<f64>().ok()?;
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

#[derive(Debug, Clone, Default)]
pub struct ConversionPanel {
    direction: Direction,
    amount: String,
    history: History,
}

impl ConversionPanel {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Switches direction. Returns `false` and changes nothing while no rate
    /// is loaded.
    pub fn set_direction(&mut self, inverse: bool, rate: Option<&Rate>) -> bool {
        if rate.is_none() {
            debug!("Ignoring direction change, rate not loaded");
            return false;
        }
        self.direction = Direction::from_inverse(inverse);
        true
    }

    pub fn toggle_direction(&mut self, rate: Option<&Rate>) -> bool {
        self.set_direction(!self.direction.is_inverse(), rate)
    }

    pub fn effective_rate(&self, rate: &Rate) -> f64 {
        self.direction.effective_rate(rate)
    }

    /// Effective rate rounded to 4 places.
    pub fn display_rate(&self, rate: &Rate) -> f64 {
        round_to(self.effective_rate(rate), 4)
    }

    pub fn set_amount(&mut self, text: &str) {
        self.amount = text.to_string();
    }

    pub fn clear_amount(&mut self) {
        self.amount.clear();
    }

    /// Result for `amount_text` at the effective rate, rounded to 2 places.
    pub fn convert(&self, amount_text: &str, rate: Option<&Rate>) -> Option<f64> {
        let rate = rate?;
        let amount = parse_amount(amount_text)?;
        let result = amount * self.effective_rate(rate);
        result.is_finite().then(|| round_to(result, 2))
    }

    /// Live result for the pending amount.
    pub fn preview(&self, rate: Option<&Rate>) -> Option<f64> {
        self.convert(&self.amount, rate)
    }

    /// Records a conversion and clears the pending amount.
    pub fn commit(&mut self, amount: f64, result: f64) -> ConversionEntry {
        let entry = ConversionEntry::new(amount, result, self.direction);
        if let Some(evicted) = self.history.push(entry.clone()) {
            debug!(id = %evicted.id, "Evicted oldest conversion");
        }
        self.amount.clear();
        entry
    }

    /// Converts and commits the pending amount. No-op when it does not
    /// convert.
    pub fn commit_pending(&mut self, rate: Option<&Rate>) -> Option<ConversionEntry> {
        let result = self.preview(rate)?;
        let amount = parse_amount(&self.amount)?;
        Some(self.commit(amount, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rate(mid: f64) -> Rate {
        Rate::new(mid, NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("10"), Some(10.0));
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        for invalid in ["", "   ", "abc", "-1x", "-1", "1,2,3", "NaN", "inf"] {
            assert_eq!(parse_amount(invalid), None, "input {invalid:?}");
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(43.2100000001, 2), 43.21);
        assert_eq!(round_to(0.231428, 4), 0.2314);
        assert_eq!(round_to(1.005, 0), 1.0);
        assert_eq!(round_to(4.321e306, 2), 4.321e306);
    }

    #[test]
    fn test_convert_normal_direction() {
        let panel = ConversionPanel::default();
        let rate = rate(4.3210);
        assert_eq!(panel.convert("10", Some(&rate)), Some(43.21));
        assert_eq!(panel.convert("2.5", Some(&rate)), Some(10.8));
    }

    #[test]
    fn test_convert_matches_rounded_product() {
        let panel = ConversionPanel::default();
        let rate = rate(4.2735);
        for amount in [0.0, 1.0, 3.33, 100.0, 1234.56, 99999.99] {
            let expected = round_to(amount * 4.2735, 2);
            assert_eq!(
                panel.convert(&amount.to_string(), Some(&rate)),
                Some(expected),
                "amount {amount}"
            );
        }
    }

    #[test]
    fn test_convert_huge_amounts() {
        let mut panel = ConversionPanel::default();
        let rate = rate(4.321);

        let result = panel.convert("1e306", Some(&rate)).unwrap();
        assert!(result.is_finite());
        assert_eq!(result, 1e306 * 4.321);

        panel.set_amount("1e308");
        assert_eq!(panel.preview(Some(&rate)), None);
        assert!(panel.commit_pending(Some(&rate)).is_none());
        assert!(panel.history().is_empty());
        assert_eq!(panel.amount(), "1e308");
    }

    #[test]
    fn test_convert_without_rate() {
        let panel = ConversionPanel::default();
        assert_eq!(panel.convert("10", None), None);
    }

    #[test]
    fn test_inverse_display_rate() {
        let mut panel = ConversionPanel::default();
        let rate = rate(4.3210);
        assert!(panel.set_direction(true, Some(&rate)));
        assert_eq!(panel.display_rate(&rate), 0.2314);
        assert_eq!(panel.direction().base_code(), "PLN");
        assert_eq!(panel.direction().quote_code(), "EUR");
    }

    #[test]
    fn test_double_toggle_restores_rate() {
        let mut panel = ConversionPanel::default();
        for mid in [4.3210, 0.5, 1.0, 123.4567] {
            let rate = rate(mid);
            let original = panel.effective_rate(&rate);
            panel.toggle_direction(Some(&rate));
            assert_eq!(panel.effective_rate(&rate), 1.0 / mid);
            panel.toggle_direction(Some(&rate));
            assert_eq!(panel.effective_rate(&rate), original);
        }
    }

    #[test]
    fn test_direction_change_needs_rate() {
        let mut panel = ConversionPanel::default();
        assert!(!panel.toggle_direction(None));
        assert_eq!(panel.direction(), Direction::EurToPln);
    }

    #[test]
    fn test_commit_records_and_clears_amount() {
        let mut panel = ConversionPanel::default();
        let rate = rate(4.3210);
        panel.set_amount("10");

        let entry = panel.commit_pending(Some(&rate)).unwrap();
        assert_eq!(entry.amount, 10.0);
        assert_eq!(entry.result, 43.21);
        assert_eq!(entry.direction, Direction::EurToPln);
        assert_eq!(panel.amount(), "");
        assert_eq!(panel.history().len(), 1);
        assert_eq!(panel.history().latest(), Some(&entry));
    }

    #[test]
    fn test_invalid_amount_changes_nothing() {
        let mut panel = ConversionPanel::default();
        let rate = rate(4.3210);
        panel.set_amount("10");
        panel.commit_pending(Some(&rate));

        for invalid in ["", "abc", "-1x"] {
            panel.set_amount(invalid);
            assert_eq!(panel.preview(Some(&rate)), None);
            assert!(panel.commit_pending(Some(&rate)).is_none());
            assert_eq!(panel.amount(), invalid);
            assert_eq!(panel.history().len(), 1);
        }
    }

    #[test]
    fn test_six_commits_evict_the_first() {
        let mut panel = ConversionPanel::default();
        let rate = rate(4.0);
        for n in 1..=6 {
            panel.set_amount(&n.to_string());
            panel.commit_pending(Some(&rate)).unwrap();
        }

        let amounts: Vec<f64> = panel.history().iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![6.0, 5.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn test_inverse_commit_uses_inverse_rate() {
        let mut panel = ConversionPanel::new(Direction::PlnToEur);
        let rate = rate(4.0);
        panel.set_amount("10");
        let entry = panel.commit_pending(Some(&rate)).unwrap();
        assert_eq!(entry.result, 2.5);
        assert_eq!(entry.direction, Direction::PlnToEur);
    }
}
