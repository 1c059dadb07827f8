//! Koyomi calendar recurrence rules - shared configuration and error types.

pub mod config;
pub mod error;
