pub mod caching;
pub mod nbp;

pub use caching::CachingRateProvider;
pub use nbp::NbpRateProvider;
