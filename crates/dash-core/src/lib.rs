//! dash-core
//!
//! Entitlement resolution, freemium quota gating, period accounting, and
//! calendar windows for the dashboard.
//! Depends on dash-domain. Pure and synchronous: no I/O, no network, no storage.

pub mod aggregate;
pub mod calendar;
pub mod entitlement;
pub mod error;
pub mod quota;
pub mod recurrence;
pub mod time;

pub use aggregate::*;
pub use calendar::*;
pub use entitlement::*;
pub use error::CoreError;
pub use quota::*;
pub use recurrence::*;
pub use time::*;
