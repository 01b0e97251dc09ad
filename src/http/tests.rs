use super::*;
use crate::config::{RequestMethod, RequestSpec};
use crate::error::{AppError, AppResult};
use crate::logs::{HeaderRedaction, setup_request_log};
use chrono::Local;
use serde_json::json;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn test_error(message: impl Into<String>) -> AppError {
    AppError::from(std::io::Error::other(message.into()))
}

/// Serves `connections` requests with a canned response and forwards each raw
/// request text over the returned channel.
fn spawn_canned_server(
    status_line: &'static str,
    body: &'static str,
    connections: usize,
) -> AppResult<(String, mpsc::Receiver<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for _ in 0..connections {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let raw = read_request(&mut stream);
            if tx.send(raw).is_err() {
                return;
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Test: canned\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            drop(stream.write_all(response.as_bytes()));
            drop(stream.flush());
        }
    });
    Ok((format!("http://{}", addr), rx))
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        let read = match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(read) => read,
        };
        data.extend_from_slice(buffer.get(..read).unwrap_or_default());
        let text = String::from_utf8_lossy(&data).into_owned();
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if body.len() >= content_length {
                return text;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn closed_port_host() -> AppResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

fn test_client() -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|err| test_error(format!("client build failed: {}", err)))
}

fn spec(path: &str, method: RequestMethod) -> RequestSpec {
    RequestSpec {
        path: path.to_owned(),
        method,
        query: None,
        body: None,
    }
}

#[test]
fn join_url_inserts_single_separator() -> AppResult<()> {
    let cases = [
        ("http://h:8080", "items", "http://h:8080/items"),
        ("http://h:8080", "/items", "http://h:8080/items"),
        ("http://h:8080/", "/items", "http://h:8080//items"),
        ("http://h:8080", "", "http://h:8080/"),
    ];
    for (host, path, expected) in cases {
        let joined = join_url(host, path);
        if joined != expected {
            return Err(test_error(format!(
                "join_url({}, {}) = {}, expected {}",
                host, path, joined, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn extract_port_from_scheme_or_explicit_port() -> AppResult<()> {
    let cases = [
        ("http://h", Some(80)),
        ("https://h", Some(443)),
        ("http://h:9000", Some(9000)),
        ("https://h:8443/api", Some(8443)),
        ("ftp://h", None),
        ("not a url", None),
    ];
    for (host, expected) in cases {
        let port = extract_port(host);
        if port != expected {
            return Err(test_error(format!(
                "extract_port({}) = {:?}, expected {:?}",
                host, port, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn success_band_is_200_to_209() -> AppResult<()> {
    for status in [200_u16, 201, 204, 209] {
        if !is_success_status(status) {
            return Err(test_error(format!("{} should succeed", status)));
        }
    }
    for status in [0_u16, 199, 210, 226, 302, 404, 500, 599] {
        if is_success_status(status) {
            return Err(test_error(format!("{} should fail", status)));
        }
    }
    let outcome = RequestOutcome::completed(Duration::from_millis(5), 204, 0);
    if !outcome.success {
        return Err(test_error("204 outcome should be a success"));
    }
    Ok(())
}

#[tokio::test]
async fn post_sends_query_body_and_headers() -> AppResult<()> {
    let (host, requests) = spawn_canned_server("201 Created", "created", 1)?;
    let dir = tempdir()?;
    let (log, writer) = setup_request_log(dir.path(), &Local::now(), HeaderRedaction::Redact).await?;
    let executor = HttpExecutor::new(test_client()?, host.clone(), Some("tok123"), log)?;

    let mut request = spec("items", RequestMethod::Post);
    request.query = serde_json::from_value(json!({ "page": 2 }))?;
    request.body = Some(json!({ "name": "widget" }));

    let outcome = executor.execute(&request).await?;
    if !outcome.success || outcome.status_code != 201 {
        return Err(test_error(format!("unexpected outcome {:?}", outcome)));
    }
    if outcome.response_bytes != 7 {
        return Err(test_error(format!(
            "unexpected byte count {}",
            outcome.response_bytes
        )));
    }

    let raw = requests
        .recv_timeout(Duration::from_secs(5))
        .map_err(|err| test_error(format!("no request captured: {}", err)))?;
    let lowered = raw.to_ascii_lowercase();
    let checks = [
        (raw.starts_with("POST /items?page=2 HTTP/1.1"), "request line"),
        (lowered.contains("content-type: application/json"), "content type"),
        (lowered.contains("authorization: bearer tok123"), "bearer token"),
        (raw.ends_with(r#"{"name":"widget"}"#), "json body"),
    ];
    for (ok, what) in checks {
        if !ok {
            return Err(test_error(format!("missing {} in {}", what, raw)));
        }
    }

    let path = writer.path().to_path_buf();
    drop(executor);
    writer.finish(Vec::new()).await?;
    let content = std::fs::read_to_string(path)?;
    let expected_request = format!("POST request to {}/items", host);
    if !content.contains(&expected_request) || !content.contains("Response with status: 201") {
        return Err(test_error(format!("unexpected log {}", content)));
    }
    if !content.contains("Body: created") || content.contains("tok123") {
        return Err(test_error(format!("unexpected log body {}", content)));
    }
    Ok(())
}

#[tokio::test]
async fn get_omits_body_and_classifies_error_status() -> AppResult<()> {
    let (host, requests) = spawn_canned_server("404 Not Found", "missing", 1)?;
    let dir = tempdir()?;
    let (log, writer) = setup_request_log(dir.path(), &Local::now(), HeaderRedaction::Redact).await?;
    let executor = HttpExecutor::new(test_client()?, host, None, log)?;

    let mut request = spec("/things/1", RequestMethod::Get);
    request.body = Some(json!({ "ignored": true }));
    let outcome = executor.execute(&request).await?;
    if outcome.success || outcome.status_code != 404 {
        return Err(test_error(format!("unexpected outcome {:?}", outcome)));
    }

    let raw = requests
        .recv_timeout(Duration::from_secs(5))
        .map_err(|err| test_error(format!("no request captured: {}", err)))?;
    if !raw.starts_with("GET /things/1 HTTP/1.1") || raw.contains("ignored") {
        return Err(test_error(format!("unexpected request {}", raw)));
    }
    if raw.to_ascii_lowercase().contains("authorization:") {
        return Err(test_error("no token configured, header must be absent"));
    }
    let path = writer.path().to_path_buf();
    drop(executor);
    writer.finish(Vec::new()).await?;
    let content = std::fs::read_to_string(path)?;
    if !content.contains(r#"Payload: {"ignored":true} (not sent)"#) {
        return Err(test_error(format!("configured body missing from log {}", content)));
    }
    Ok(())
}

#[tokio::test]
async fn put_without_body_sends_json_null() -> AppResult<()> {
    let (host, requests) = spawn_canned_server("200 OK", "", 1)?;
    let dir = tempdir()?;
    let (log, writer) = setup_request_log(dir.path(), &Local::now(), HeaderRedaction::Redact).await?;
    let executor = HttpExecutor::new(test_client()?, host, None, log)?;

    let outcome = executor.execute(&spec("/slot", RequestMethod::Put)).await?;
    if !outcome.success {
        return Err(test_error(format!("unexpected outcome {:?}", outcome)));
    }
    let raw = requests
        .recv_timeout(Duration::from_secs(5))
        .map_err(|err| test_error(format!("no request captured: {}", err)))?;
    if !raw.starts_with("PUT /slot HTTP/1.1") || !raw.ends_with("null") {
        return Err(test_error(format!("unexpected request {}", raw)));
    }
    drop(executor);
    writer.finish(Vec::new()).await?;
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_swallowed_and_logged() -> AppResult<()> {
    let host = closed_port_host()?;
    let dir = tempdir()?;
    let (log, writer) = setup_request_log(dir.path(), &Local::now(), HeaderRedaction::Redact).await?;
    let executor = HttpExecutor::new(test_client()?, host, None, log)?;

    let outcome = executor.execute(&spec("/down", RequestMethod::Delete)).await?;
    if outcome != RequestOutcome::failed() {
        return Err(test_error(format!("unexpected outcome {:?}", outcome)));
    }

    let path = writer.path().to_path_buf();
    drop(executor);
    writer.finish(Vec::new()).await?;
    let content = std::fs::read_to_string(path)?;
    if !content.contains("DELETE request to") || !content.contains("Response: none (") {
        return Err(test_error(format!("unexpected log {}", content)));
    }
    Ok(())
}

#[tokio::test]
async fn unsupported_method_fails_without_dispatch_or_log() -> AppResult<()> {
    let host = closed_port_host()?;
    let dir = tempdir()?;
    let (log, writer) = setup_request_log(dir.path(), &Local::now(), HeaderRedaction::Redact).await?;
    let executor = HttpExecutor::new(test_client()?, host, None, log)?;

    let outcome = executor
        .execute(&spec(
            "/x",
            RequestMethod::Unsupported("PATCH".to_owned()),
        ))
        .await?;
    if outcome != RequestOutcome::failed() {
        return Err(test_error(format!("unexpected outcome {:?}", outcome)));
    }

    drop(executor);
    let written = writer.finish(Vec::new()).await?;
    if written != 0 {
        return Err(test_error("unsupported method must not be logged"));
    }
    Ok(())
}
