#![forbid(unsafe_code)]

pub mod check;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod logging;
pub mod notify;
pub mod schedule;
pub mod store;
pub mod threshold;
