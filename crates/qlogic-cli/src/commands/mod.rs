//! CLI command implementations.

pub mod common;
pub mod config;
pub mod draw;
pub mod gates;
pub mod run;
pub mod train;
