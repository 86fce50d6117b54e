//! Shared helpers used across the analytics modules

pub mod math;
