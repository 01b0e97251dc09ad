use std::fmt::Write as _;

use chrono::{DateTime, Local};

/// Header values that are replaced before they reach the log file.
const REDACTED_HEADERS: [&str; 1] = ["authorization"];

/// How credential headers are written to the request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderRedaction {
    /// Replace credential values with `<redacted>`.
    #[default]
    Redact,
    /// Write every header exactly as sent.
    Verbatim,
}

#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub timestamp: DateTime<Local>,
    pub method: String,
    pub url: String,
    pub request_headers: Vec<(String, String)>,
    pub payload: Option<String>,
    pub response: Result<ResponseRecord, String>,
}

#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RequestRecord {
    /// Renders the record as a log block, including the leading separator.
    pub(crate) fn render(&self, redaction: HeaderRedaction) -> Result<String, std::fmt::Error> {
        let mut block = String::new();
        writeln!(block)?;
        writeln!(block, "--- {} ---", format_ctime(&self.timestamp))?;
        writeln!(block, "{} request to {}", self.method, self.url)?;
        writeln!(block, "Headers: {}", format_headers(&self.request_headers, redaction))?;
        writeln!(
            block,
            "Payload: {}",
            self.payload.as_deref().unwrap_or("none")
        )?;
        match &self.response {
            Ok(response) => {
                writeln!(block, "Response with status: {}", response.status)?;
                writeln!(block, "Headers: {}", format_headers(&response.headers, redaction))?;
                writeln!(block, "Body: {}", response.body)?;
            }
            Err(reason) => {
                writeln!(block, "Response: none ({})", reason)?;
            }
        }
        Ok(block)
    }
}

pub(crate) fn format_ctime(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%a %b %e %H:%M:%S %Y").to_string()
}

pub(crate) fn format_headers(headers: &[(String, String)], redaction: HeaderRedaction) -> String {
    let mut rendered = String::from("{");
    for (index, (name, value)) in headers.iter().enumerate() {
        if index > 0 {
            rendered.push_str(", ");
        }
        let shown = if redaction == HeaderRedaction::Redact
            && REDACTED_HEADERS
                .iter()
                .any(|redacted| name.eq_ignore_ascii_case(redacted))
        {
            "<redacted>"
        } else {
            value.as_str()
        };
        rendered.push('\'');
        rendered.push_str(name);
        rendered.push_str("': '");
        rendered.push_str(shown);
        rendered.push('\'');
    }
    rendered.push('}');
    rendered
}
