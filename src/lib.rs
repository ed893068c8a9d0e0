#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod count;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod logging;
pub mod resolve;
pub mod scrape;
pub mod section;
pub mod store;
