//! Append-only request log shared by all workers.
//!
//! Workers hand records to a [`RequestLog`] handle; a single writer task owns
//! the file and appends one block per record, so concurrent workers never
//! interleave partial blocks.
mod record;
mod writer;


pub use record::{HeaderRedaction, RequestRecord, ResponseRecord};
pub use writer::{RequestLog, RequestLogWriter, log_file_name, setup_request_log};
