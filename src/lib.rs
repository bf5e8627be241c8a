#![doc(test(attr(deny(warnings))))]

//! Budget Tracker keeps income, essentials, bills, discretionary spending and savings in
//! flat CSV tables and derives 50/30/20 allocations, variances, a health score, trends and
//! recommendations from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Tracker tracing initialized.");
    });
}
