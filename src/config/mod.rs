//! Request list loading.
mod loader;
pub mod types;


pub use loader::load_request_specs;
pub use types::{RequestMethod, RequestSpec};
