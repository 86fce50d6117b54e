//! Service surface around the analytics engine

pub mod http;

pub use http::*;
