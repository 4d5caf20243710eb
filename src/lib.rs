//! cashcast
//!
//! Command-line front end for the cash-flow projection engine. Reads a JSON
//! projection request, runs the engine, and prints months, alerts and analysis.

pub mod cli;
pub mod errors;
pub mod utils;

pub use cashcast_config as config;
pub use cashcast_core as engine;
pub use cashcast_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("cashcast tracing initialized");
    });
}
