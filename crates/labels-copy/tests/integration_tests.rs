//! Runs of the binary against a canned HTTP server standing in for the GitHub API.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use labels_core::snapshot;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// One canned HTTP response
struct Reply {
    status: &'static str,
    headers: Vec<(&'static str, &'static str)>,
    body: String,
}

impl Reply {
    fn json(status: &'static str, body: serde_json::Value) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }
}

/// Serve `replies` in order, one connection each, and hand back the raw request heads
fn start_mock_server(replies: Vec<Reply>) -> (thread::JoinHandle<Vec<String>>, u16) {
    // Bind to port 0 to let the OS assign an available port
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to port");
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();

        for reply in replies {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();

            let mut head = Vec::new();
            let mut buffer = [0; 4096];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buffer) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buffer[..n]),
                }
            }
            requests.push(String::from_utf8_lossy(&head).to_string());

            let mut response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                reply.status,
                reply.body.len()
            );
            for (name, value) in &reply.headers {
                response.push_str(&format!("{}: {}\r\n", name, value));
            }
            response.push_str("\r\n");
            response.push_str(&reply.body);
            let _ = stream.write_all(response.as_bytes());
        }

        requests
    });

    (handle, port)
}

fn labels_copy(dir: &Path, port: u16) -> Command {
    let mut cmd = cargo_bin_cmd!("github-labels-copy");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("GITHUB_API_TOKEN")
        .env_remove("LABELS_COPY_TOKEN")
        .env_remove("LABELS_COPY_BASE_URL")
        .env_remove("LABELS_MOCK_DIR")
        .args(["--base-url", &format!("http://127.0.0.1:{}", port)])
        .timeout(Duration::from_secs(10));
    cmd
}

fn repo_json() -> serde_json::Value {
    serde_json::json!({
        "id": 1296269,
        "name": "source",
        "full_name": "acme/source",
        "description": null,
        "owner": { "login": "acme", "id": 1 }
    })
}

#[test]
fn test_dump_from_github() {
    let dir = tempfile::tempdir().unwrap();
    let labels = serde_json::json!([
        { "id": 1, "name": "bug", "color": "d73a4a", "description": "Something isn't working" },
        { "id": 2, "name": "good first issue", "color": "7057FF", "description": null }
    ]);
    let (server, port) = start_mock_server(vec![
        Reply::json("200 OK", repo_json()),
        Reply::json("200 OK", labels),
    ]);

    labels_copy(dir.path(), port)
        .args(["--token", "test-token", "--dump", "acme/source"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dumping labels into labels.yaml"))
        .stdout(predicate::str::contains("2 created"));

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /repos/acme/source HTTP/1.1"));
    assert!(requests[1].starts_with("GET /repos/acme/source/labels?per_page=100&page=1 HTTP/1.1"));
    assert!(requests[0]
        .to_lowercase()
        .contains("authorization: bearer test-token"));

    let dumped = snapshot::read_file(dir.path().join("labels.yaml")).unwrap();
    assert_eq!(dumped.len(), 2);
    assert_eq!(dumped.get("good first issue").unwrap().color(), "7057ff");
    assert_eq!(
        dumped.get("bug").unwrap().description(),
        Some("Something isn't working")
    );
}

#[test]
fn test_token_and_base_url_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let (server, port) = start_mock_server(vec![
        Reply::json("200 OK", repo_json()),
        Reply::json("200 OK", serde_json::json!([])),
    ]);

    let mut cmd = cargo_bin_cmd!("github-labels-copy");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env_remove("LABELS_COPY_TOKEN")
        .env_remove("LABELS_MOCK_DIR")
        .env("GITHUB_API_TOKEN", "env-token")
        .env("LABELS_COPY_BASE_URL", format!("http://127.0.0.1:{}", port))
        .args(["--dump", "acme/source"])
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));

    let requests = server.join().unwrap();
    assert!(requests[0]
        .to_lowercase()
        .contains("authorization: bearer env-token"));
}

#[test]
fn test_bad_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, port) = start_mock_server(vec![Reply::json(
        "401 Unauthorized",
        serde_json::json!({ "message": "Bad credentials" }),
    )]);

    labels_copy(dir.path(), port)
        .args(["--token", "wrong", "acme/source", "acme/dest"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Bad credentials"));
}

#[test]
fn test_two_factor_required() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, port) = start_mock_server(vec![Reply::json(
        "401 Unauthorized",
        serde_json::json!({ "message": "Must specify two-factor authentication OTP code." }),
    )
    .with_header("X-GitHub-OTP", "required; app")]);

    labels_copy(dir.path(), port)
        .args(["--token", "t", "acme/source", "acme/dest"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Two factor authentication required"));
}

#[test]
fn test_source_repository_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (_server, port) = start_mock_server(vec![Reply::json(
        "404 Not Found",
        serde_json::json!({ "message": "Not Found" }),
    )]);

    labels_copy(dir.path(), port)
        .args(["--token", "t", "acme/source", "acme/dest"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open source repository acme/source"))
        .stderr(predicate::str::contains(
            "Repository not found: acme/source. Check your credentials.",
        ));
}

#[test]
fn test_connection_refused() {
    let dir = tempfile::tempdir().unwrap();

    // Nothing listens on port 1
    labels_copy(dir.path(), 1)
        .args(["--token", "t", "acme/source", "acme/dest"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Connection error"));
}
