//! HTTP request execution against the target host.
mod client;
mod executor;
mod target;

#[cfg(test)]
mod tests;

pub use client::build_client;
pub use executor::{HttpExecutor, RequestExecutor, RequestOutcome, is_success_status};
pub use target::{extract_port, join_url};
