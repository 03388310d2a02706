//! Terminal front end

pub mod rate;
pub mod session;
pub mod setup;
pub mod ui;
