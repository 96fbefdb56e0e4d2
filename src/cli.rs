use std::ffi::OsString;

use clap::{Parser, Subcommand};

/// Watches one retail product page and emails when the price drops below
/// the configured target. Without a subcommand, runs a single check.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the price check every day at the configured wall-clock time.
    Scheduler,
    /// Send a synthetic price alert without fetching the page.
    TestEmail,
    // Anything else falls back to a single check run.
    #[command(external_subcommand)]
    External(Vec<OsString>),
}
