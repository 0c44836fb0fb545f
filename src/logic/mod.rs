//! Core Logic Modules
//!
//! Network-free building blocks around the API clients: input validation,
//! result aggregation, session storage and the health poller.

pub mod comparison;
pub mod monitor;
pub mod session;
pub mod validation;
