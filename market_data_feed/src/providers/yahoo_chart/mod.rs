//! Yahoo chart endpoint provider.

pub mod provider;
pub mod response;

pub use provider::YahooChartProvider;
