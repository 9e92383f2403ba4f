//! dash-domain
//!
//! Row shapes fetched from the hosted backend (subscriptions, transactions,
//! events, tasks) plus the calendar window and time interval primitives.
//! No I/O, no services. Only data types and core enums.

pub mod common;
pub mod planner;
pub mod subscription;
pub mod transaction;
pub mod window;

pub use common::*;
pub use planner::*;
pub use subscription::*;
pub use transaction::*;
pub use window::*;
