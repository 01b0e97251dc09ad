//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::BenchArgs;
pub use types::PositiveUsize;

pub(crate) use defaults::DEFAULT_USER_AGENT;
