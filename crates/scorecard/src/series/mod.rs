//! KPI time-series evaluation: month-key arithmetic, series lookup, the
//! basis-aware evaluation policy, target comparison, and the report assembly
//! the series API serves. The engine reads immutable snapshots and returns
//! fresh values; it performs no I/O and never consults the clock.

pub mod domain;
pub mod evaluation;
pub mod import;
pub mod lookup;
pub mod repository;
pub mod router;
pub mod service;
pub mod target;
pub mod views;

mod period;
mod report;
mod scope;

pub use period::{InvalidPeriodFormat, PeriodKey, PeriodRange};
pub use report::build_series_report;
pub use scope::ScopeKey;
