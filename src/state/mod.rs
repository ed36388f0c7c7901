//! Dashboard state ownership.
//!
//! The state store is constructed once per process and handed to whatever
//! presents the dashboard; there is no global instance.

pub mod store;

pub use store::{
    format_timestamp, parse_timestamp, DashboardSnapshot, LoadState, StudentStateStore,
    DEFAULT_SYNC_DELAY,
};
