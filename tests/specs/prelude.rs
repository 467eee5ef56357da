//! Shared harness: a scripted manager and a `wmctl` runner.

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

pub use serde_json::json;
pub use wmctl_client::{ClientConfig, CommandChannel, Error, EventSubscriber};
pub use wmctl_core::{CommandOutcome, Event, TickEvent};
pub use wmctl_wire::{CommandType, EventType, Frame, MessageType};

pub const TREE: &str = r#"{
  "id": 1, "type": "root", "name": "root", "rect": {"x": 0, "y": 0, "width": 1920, "height": 1080},
  "nodes": [
    {"id": 3, "type": "output", "name": "DP-1", "current_workspace": "2",
     "nodes": [
       {"id": 5, "type": "workspace", "name": "2",
        "nodes": [
          {"id": 6, "type": "con", "name": "foot", "app_id": "foot", "pid": 1234, "focused": true}
        ]}
     ]}
  ]
}"#;

pub const WORKSPACES: &str = r#"[{"num":2,"name":"2","visible":true,"focused":true,"urgent":false,"output":"DP-1"}]"#;
pub const VERSION: &str =
    r#"{"major":1,"minor":10,"patch":1,"human_readable":"1.10.1","loaded_config_file_name":"/etc/sway/config"}"#;
pub const WORKSPACE_FOCUS: &str = r#"{"change":"focus","current":{"id":5,"type":"workspace","name":"2"}}"#;
pub const WINDOW_FOCUS: &str = r#"{"change":"focus","container":{"id":6,"type":"con","name":"foot"}}"#;

/// What the manager does after reading one request.
pub struct Response {
    pub frames: Vec<Frame>,
    /// Close the connection once `frames` are written.
    pub hang_up: bool,
}

impl Response {
    pub fn reply(frames: Vec<Frame>) -> Self {
        Self { frames, hang_up: false }
    }

    /// Read the request and never answer.
    pub fn silence() -> Self {
        Self::reply(Vec::new())
    }

    pub fn then_hang_up(mut self) -> Self {
        self.hang_up = true;
        self
    }
}

type Handler = dyn Fn(&Frame) -> Response + Send + Sync;

/// Scripted window manager bound to a socket in a temporary directory.
///
/// Every connection is served on its own thread; requests are recorded in
/// arrival order.
pub struct FakeManager {
    _dir: TempDir,
    path: PathBuf,
    requests: Arc<Mutex<Vec<Frame>>>,
}

impl FakeManager {
    pub fn start() -> Self {
        Self::with_handler(sway_like)
    }

    pub fn with_handler(handler: impl Fn(&Frame) -> Response + Send + Sync + 'static) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipc.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let log = Arc::clone(&requests);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let handler = Arc::clone(&handler);
                let log = Arc::clone(&log);
                std::thread::spawn(move || serve(stream, handler.as_ref(), &log));
            }
        });

        Self { _dir: dir, path, requests }
    }

    pub fn socket(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.path)
    }

    pub fn requests(&self) -> Vec<Frame> {
        self.requests.lock().unwrap().clone()
    }

    /// `wmctl` pointed at this manager through `SWAYSOCK`.
    pub fn wmctl(&self) -> Wmctl {
        wmctl().env("SWAYSOCK", &self.path)
    }
}

fn serve(mut stream: UnixStream, handler: &Handler, log: &Mutex<Vec<Frame>>) {
    loop {
        let mut header = [0u8; wmctl_wire::HEADER_LEN];
        if stream.read_exact(&mut header).is_err() {
            return;
        }
        let Ok(header) = wmctl_wire::decode_header(&header) else { return };
        let mut payload = vec![0u8; header.payload_len as usize];
        if stream.read_exact(&mut payload).is_err() {
            return;
        }
        let Ok(request) = wmctl_wire::decode(header, payload) else { return };
        log.lock().unwrap().push(request.clone());

        let response = handler(&request);
        for frame in &response.frames {
            if stream.write_all(&frame.encode().unwrap()).is_err() {
                return;
            }
        }
        if response.hang_up {
            return;
        }
    }
}

/// Answers like a sway session with one output, one workspace, one view.
///
/// Commands starting with `bogus` are rejected as unparseable. A subscription
/// gets two focus events and then the connection is closed.
pub fn sway_like(request: &Frame) -> Response {
    let MessageType::Command(command) = request.message_type else {
        return Response::silence().then_hang_up();
    };
    let payload = match command {
        CommandType::RunCommand => run_outcomes(&request.payload),
        CommandType::GetTree => TREE.to_string(),
        CommandType::GetWorkspaces => WORKSPACES.to_string(),
        CommandType::GetVersion => VERSION.to_string(),
        CommandType::SendTick | CommandType::Sync => r#"{"success":true}"#.to_string(),
        CommandType::Subscribe => {
            return Response::reply(vec![
                Frame::new(CommandType::Subscribe, r#"{"success":true}"#),
                Frame::new(EventType::Workspace, WORKSPACE_FOCUS),
                Frame::new(EventType::Window, WINDOW_FOCUS),
            ])
            .then_hang_up();
        }
        _ => "[]".to_string(),
    };
    Response::reply(vec![Frame::new(command, payload)])
}

fn run_outcomes(commands: &str) -> String {
    let outcomes: Vec<serde_json::Value> = commands
        .split(';')
        .map(str::trim)
        .map(|command| {
            if command.starts_with("bogus") {
                json!({"success": false, "parse_error": true, "error": format!("Unknown/invalid command '{command}'")})
            } else {
                json!({"success": true})
            }
        })
        .collect();
    serde_json::Value::Array(outcomes).to_string()
}

/// `wmctl` with no socket configured and colors off.
pub fn wmctl() -> Wmctl {
    let mut cmd = assert_cmd::Command::cargo_bin("wmctl").unwrap();
    cmd.env_remove("SWAYSOCK")
        .env_remove("I3SOCK")
        .env_remove("WMCTL_LOG")
        .env("NO_COLOR", "1")
        .timeout(std::time::Duration::from_secs(10));
    Wmctl { cmd }
}

pub struct Wmctl {
    cmd: assert_cmd::Command,
}

impl Wmctl {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome::from(self.cmd.assert().success())
    }

    pub fn exits_with(mut self, code: i32) -> Outcome {
        Outcome::from(self.cmd.assert().code(code))
    }
}

pub struct Outcome {
    pub stdout: String,
    pub stderr: String,
}

impl From<assert_cmd::assert::Assert> for Outcome {
    fn from(assert: assert_cmd::assert::Assert) -> Self {
        let output = assert.get_output();
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }

    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}
