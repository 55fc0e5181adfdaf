//! `macro-archive` library crate.
//!
//! The binary (`mda`) is a thin wrapper around this library so that:
//!
//! - the fetch/transform/render pipeline is testable without the network
//! - batch builds and the interactive builder share one code path
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod narrative;
pub mod plot;
pub mod report;
pub mod session;
pub mod transform;
pub mod tui;
