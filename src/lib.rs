#![doc(test(attr(deny(warnings))))]

//! Dashboard Core resolves plan entitlements, gates freemium quotas, and
//! aggregates budget periods for the productivity/finance dashboard.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod snapshot;
pub mod utils;

pub use dash_core as engine;
pub use dash_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Dashboard Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
