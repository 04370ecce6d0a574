//! Implementation of chess environment, its rules and specifics.

pub mod core;
pub mod position;
pub mod record;
