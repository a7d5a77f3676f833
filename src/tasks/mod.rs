//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry Reaper: Removes expired cache entries at a fixed interval

mod reaper;

pub use reaper::ExpiryReaper;
