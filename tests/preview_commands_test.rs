//! Drive the preview commands over stdio, the way an editor client would
use std::io::{BufRead, BufReader, Write};
use std::process::{ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

const SERVER_TIMEOUT: Duration = Duration::from_secs(5);

struct Session {
    child: std::process::Child,
    reader: BufReader<ChildStdout>,
    next_id: u64,
    notifications: Vec<Value>,
}

impl Session {
    /// Spawn the server and complete the initialize handshake
    fn start() -> Self {
        let mut session = Session::spawn();
        session.initialize();
        session.notify("initialized", serde_json::json!({}));
        session
    }

    fn spawn() -> Self {
        let bin_path = std::env::var("CARGO_BIN_EXE_mdpreview-ls")
            .unwrap_or_else(|_| "target/debug/mdpreview-ls".to_string());

        let mut child = Command::new(bin_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .env("MDPREVIEW_LS_TEST_EXIT", "1")
            .spawn()
            .expect("Failed to spawn preview server");

        let stdout = child
            .stdout
            .take()
            .expect("Child stdout should be available");

        Session {
            child,
            reader: BufReader::new(stdout),
            next_id: 1,
            notifications: Vec::new(),
        }
    }

    fn initialize(&mut self) -> Value {
        self.request(
            "initialize",
            serde_json::json!({
                "processId": null,
                "rootUri": null,
                "capabilities": {
                    "workspace": {
                        "executeCommand": { "dynamicRegistration": false }
                    }
                },
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }),
        )
    }

    fn send(&mut self, message: &Value) {
        let body = message.to_string();
        let request = format!("Content-Length: {}\r\n\r\n{}", body.len(), body);
        let stdin = self
            .child
            .stdin
            .as_mut()
            .expect("Child stdin should be available");
        stdin
            .write_all(request.as_bytes())
            .expect("Failed to write request");
        stdin.flush().expect("Failed to flush stdin");
    }

    fn notify(&mut self, method: &str, params: Value) {
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        }));
    }

    fn request(&mut self, method: &str, params: Value) -> Value {
        let id = self.next_id;
        self.next_id += 1;
        self.send(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        }));
        self.read_response(id)
    }

    fn command(&mut self, command: &str, arguments: Value) -> Value {
        let response = self.request(
            "workspace/executeCommand",
            serde_json::json!({ "command": command, "arguments": arguments }),
        );
        response
            .get("result")
            .cloned()
            .unwrap_or_else(|| panic!("Command {} failed: {}", command, response))
    }

    fn read_message(&mut self) -> Value {
        let start_time = Instant::now();
        let mut content_length = None;

        loop {
            if start_time.elapsed() > SERVER_TIMEOUT {
                panic!("Timeout waiting for response headers");
            }

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => panic!("Unexpected EOF while reading headers"),
                Ok(_) => {
                    if line.trim().is_empty() {
                        break;
                    }
                    if let Some(length_str) = line.strip_prefix("Content-Length:") {
                        content_length = Some(
                            length_str
                                .trim()
                                .parse::<usize>()
                                .expect("Invalid Content-Length header"),
                        );
                    }
                }
                Err(e) => panic!("Error reading headers: {}", e),
            }
        }

        let mut body = vec![0u8; content_length.expect("Missing Content-Length header")];
        std::io::Read::read_exact(&mut self.reader, &mut body)
            .expect("Failed to read message body");
        serde_json::from_slice(&body).expect("Valid JSON message")
    }

    fn read_response(&mut self, id: u64) -> Value {
        loop {
            let message = self.read_message();
            if message.get("id").and_then(|v| v.as_u64()) == Some(id)
                && message.get("method").is_none()
            {
                return message;
            }
            if message.get("method").is_some() {
                self.notifications.push(message);
            }
        }
    }

    /// Wait until a notification with `method` shows up and take it
    fn take_notification(&mut self, method: &str) -> Value {
        loop {
            if let Some(pos) = self
                .notifications
                .iter()
                .position(|n| n.get("method").and_then(|m| m.as_str()) == Some(method))
            {
                return self.notifications.remove(pos);
            }
            let message = self.read_message();
            if message.get("method").is_some() {
                self.notifications.push(message);
            }
        }
    }

    fn count(&self, method: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.get("method").and_then(|m| m.as_str()) == Some(method))
            .count()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        drop(self.child.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn initialize_advertises_preview_commands() {
    let mut session = Session::spawn();

    let response = session.initialize();
    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["serverInfo"]["name"], "mdpreview-ls");

    let commands = response["result"]["capabilities"]["executeCommandProvider"]["commands"]
        .as_array()
        .expect("Should advertise executeCommand");
    for expected in [
        "markdownPreview.load",
        "markdownPreview.drop",
        "markdownPreview.openEditor",
        "markdownPreview.edit",
        "markdownPreview.update",
        "markdownPreview.closeEditor",
        "markdownPreview.state",
    ] {
        assert!(
            commands.iter().any(|c| c.as_str() == Some(expected)),
            "Missing command {}",
            expected
        );
    }
}

#[test]
fn initialized_logs_active_config() {
    let mut session = Session::start();

    let log = session.take_notification("window/logMessage");
    let message = log["params"]["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("mdpreview-ls initialized"));
    assert!(message.contains("heading prefix: \"markdown-header-\""));
    assert!(message.contains("page output: none"));
}

#[test]
fn load_edit_and_discard() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let doc = dir.path().join("hi.md");
    std::fs::write(&doc, "# Hi").expect("write doc");

    let mut session = Session::start();

    let state = session.command("markdownPreview.load", serde_json::json!([doc]));
    assert_eq!(state["applied"], true);
    assert_eq!(state["state"], "loaded");
    assert_eq!(state["source"], "# Hi");

    let rendered = session.take_notification("markdownPreview/didRender");
    let html = rendered["params"]["html"].as_str().expect("html string");
    assert_eq!(
        html,
        "<article class=\"markdown-body\"><h1 id=\"markdown-header-hi\">Hi</h1>\n</article>"
    );

    let state = session.command("markdownPreview.openEditor", serde_json::json!([]));
    assert_eq!(state["state"], "editing");
    assert_eq!(state["buffer"], "# Hi");

    let state = session.command("markdownPreview.update", serde_json::json!(["new text"]));
    assert_eq!(state["applied"], true);
    assert_eq!(state["source"], "new text");

    session.command("markdownPreview.openEditor", serde_json::json!([]));
    session.command("markdownPreview.edit", serde_json::json!(["other"]));
    let state = session.command("markdownPreview.closeEditor", serde_json::json!([]));
    assert_eq!(state["applied"], true);
    assert_eq!(state["state"], "loaded");
    assert_eq!(state["source"], "new text");
}

#[test]
fn unsupported_drop_is_silent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let photo = dir.path().join("photo.png");
    std::fs::write(&photo, "png").expect("write photo");

    let mut session = Session::start();

    let state = session.command("markdownPreview.drop", serde_json::json!([[photo]]));
    assert_eq!(state["applied"], false);
    assert_eq!(state["state"], "empty");

    let state = session.command("markdownPreview.state", serde_json::json!([]));
    assert!(state.get("applied").is_none());
    assert_eq!(session.count("window/showMessage"), 0);
    assert_eq!(session.count("markdownPreview/didRender"), 0);
}

#[test]
fn read_failure_shows_one_message() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("missing.md");

    let mut session = Session::start();

    let state = session.command("markdownPreview.load", serde_json::json!([missing]));
    assert_eq!(state["applied"], false);
    assert_eq!(state["state"], "empty");

    let message = session.take_notification("window/showMessage");
    assert_eq!(message["params"]["type"], 1);
    assert!(
        message["params"]["message"]
            .as_str()
            .unwrap_or_default()
            .contains("missing.md")
    );

    session.command("markdownPreview.state", serde_json::json!([]));
    assert_eq!(session.count("window/showMessage"), 0);
}

#[test]
fn unknown_command_is_rejected() {
    let mut session = Session::start();

    let response = session.request(
        "workspace/executeCommand",
        serde_json::json!({ "command": "markdownPreview.explode", "arguments": [] }),
    );
    assert!(response.get("error").is_some());
}
