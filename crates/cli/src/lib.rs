//! Command-line front end for the courtside vendor client.

pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod styles;
pub mod users;
pub mod vault;
