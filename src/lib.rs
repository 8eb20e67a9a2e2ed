pub mod config;
pub mod fetch;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod process;
pub mod scrape;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use pipeline::{run, RunSummary};
