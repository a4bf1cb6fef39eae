// Command-line front end for the rosterlab engine: config loading, argument
// parsing and command dispatch.

pub mod cli;
pub mod commands;
pub mod config;
