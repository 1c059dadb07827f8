//! Occurrence materialization for stored recurrence rules.

pub mod error;
pub mod recurrence;
