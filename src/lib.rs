//! marquee library
//!
//! Terminal catalog browser for The Movie Database. The binary wires these
//! modules to a crossterm terminal; integration tests use them directly.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod loader;
pub mod logging;
pub mod page;
pub mod search;
pub mod tmdb;
pub mod ui;
pub mod watchlist;
