//! `poll-trends` library crate.
//!
//! The binary (`polls`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or hitting the network
//! - modules are reusable (e.g., future dashboards, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod agg;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
