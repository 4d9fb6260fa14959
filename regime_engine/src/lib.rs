//! Market-regime classification and series-synthesis engine.
//!
//! Given OHLC series from [`market_data_feed`], this crate derives a
//! discrete regime label per instrument and timeframe (yearly, weekly,
//! daily opening-range windows plus intraday session windows), synthesizes
//! derived series (ratios, equal-weight and geometric composites), and
//! collapses the per-timeframe frames into one flat summary record per
//! instrument.
//!
//! Every function here is pure with respect to its inputs; distinct
//! instruments can be classified concurrently without coordination. The
//! engine surfaces no fatal errors - all degradations (no data, short
//! history, empty alignment, wrong sampling frequency) propagate as empty
//! series or empty frames.

#![deny(missing_docs)]

pub mod aggregate;
pub mod algebra;
pub mod classify;
pub mod config;
pub mod pipeline;
pub mod synth;
pub mod universe;
