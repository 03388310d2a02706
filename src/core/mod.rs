//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod converter;
pub mod history;
pub mod log;
pub mod panel;
pub mod rate;

// Re-export main types for cleaner imports
pub use converter::{Converter, ConverterView};
pub use history::{ConversionEntry, History};
pub use panel::{ConversionPanel, Direction};
pub use rate::{FetchError, Rate, RateProvider};
