use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rollcall"))
}

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

type Log = Arc<Mutex<Vec<Recorded>>>;

/// Serve canned responses on a loopback port until the test process exits.
fn spawn_server<F>(respond: F) -> (String, Log)
where
    F: Fn(&Recorded, usize) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            let Some(request) = read_request(&stream) else {
                continue;
            };
            let index = {
                let mut log = server_log.lock().unwrap();
                log.push(request.clone());
                log.len() - 1
            };
            let (status, body) = respond(&request, index);
            write_response(stream, status, &body);
        }
    });

    (format!("http://{}", addr), log)
}

fn read_request(stream: &TcpStream) -> Option<Recorded> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).ok()?;

    Some(Recorded {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    })
}

fn write_response(mut stream: TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn write_config(dir: &Path, base_url: &str) -> PathBuf {
    let path = dir.join("config.toml");
    let contents = format!(
        "[server]\nbase_url = \"{}\"\ntimeout_seconds = 5\nsession_cookie = \"JSESSIONID=abc123\"\n\n[attendance]\nmin_date = \"2025-12-01\"\n",
        base_url
    );
    std::fs::write(&path, contents).expect("write config");
    path
}

fn rollcall(config: &Path) -> Command {
    let mut cmd = Command::new(bin());
    cmd.arg("--config")
        .arg(config)
        .env_remove("ROLLCALL_SERVER")
        .env_remove("ROLLCALL_CONFIG")
        .env_remove("ROLLCALL_CSRF_TOKEN")
        .env_remove("ROLLCALL_LOG")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null());
    cmd
}

fn roster_body() -> String {
    r#"[
        {"id": 1, "firstName": "Anna", "lastName": "Petrova", "packageType": "GROUP8",
         "needsBook": false, "remainingLessons": 5, "debt": 0,
         "attendance": {"status": "PRESENT", "checkinTime": "09:55"}},
        {"id": 2, "firstName": "Ivan", "lastName": "Orlov", "lessonPackageTitle": "Individual 4",
         "needsBook": true, "remainingLessons": 0, "debt": null, "attendance": null}
    ]"#
    .to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn saved_body() -> String {
    r#"{"success": true, "applied": [{"studentId": 1, "applied": true, "newRemaining": 4}]}"#
        .to_string()
}

#[test]
fn test_roster_json_lists_students() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|_, _| (200, roster_body()));
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["roster", "--date", "2025-12-03", "--json"])
        .output()
        .expect("run rollcall");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["date"], "2025-12-03");
    assert_eq!(value["pending"], 0);
    assert_eq!(value["students"][0]["name"], "Petrova Anna");
    assert_eq!(value["students"][0]["status"], "PRESENT");
    assert_eq!(value["students"][1]["package"], "Individual 4");
    assert_eq!(value["students"][1]["severity"], "low");

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/teacher/attendance/json?date=2025-12-03");
    assert_eq!(requests[0].header("cookie"), Some("JSESSIONID=abc123"));
}

#[test]
fn test_roster_clamps_date_before_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|_, _| (200, "[]".to_string()));
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["roster", "--date", "2025-11-20"])
        .output()
        .expect("run rollcall");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("date=2025-12-01"));

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].target.ends_with("date=2025-12-01"));
}

#[test]
fn test_roster_server_min_date_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, _log) = spawn_server(|_, _| {
        (
            400,
            r#"{"error": "date_too_early", "minDate": "2026-01-10"}"#.to_string(),
        )
    });
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["roster", "--date", "2026-01-05"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("2026-01-10"));
}

#[test]
fn test_mark_saves_batch_and_refetches() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|request, _| {
        if request.method == "POST" {
            (200, saved_body())
        } else {
            (200, roster_body())
        }
    });
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .env("ROLLCALL_CSRF_TOKEN", "tok-42")
        .args([
            "mark",
            "--date",
            "2025-12-03",
            "--status",
            "1=late",
            "--extra",
            "1=+1",
        ])
        .output()
        .expect("run rollcall");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("status=ok"));
    assert!(out.contains("saved=1"));

    let requests = log.lock().unwrap();
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["GET", "POST", "GET"]);

    let post = &requests[1];
    assert_eq!(post.target, "/teacher/attendance/save_batch");
    assert_eq!(post.header("x-csrf-token"), Some("tok-42"));
    let body: serde_json::Value = serde_json::from_str(&post.body).expect("json body");
    assert_eq!(body["date"], "2025-12-03");
    assert_eq!(body["items"][0]["studentId"], 1);
    assert_eq!(body["items"][0]["status"], "LATE");
    assert_eq!(body["items"][0]["extraLessons"], 1);
}

#[test]
fn test_mark_application_failure_exits_with_server_code() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|request, _| {
        if request.method == "POST" {
            (200, r#"{"success": false, "error": "forbidden"}"#.to_string())
        } else {
            (200, roster_body())
        }
    });
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["mark", "--date", "2025-12-03", "--status", "2=absent", "--json"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(5));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(value["status"], "failed");
    assert_eq!(value["error"], "forbidden");

    // No re-fetch after a failed save.
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_mark_unknown_student_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|_, _| (200, roster_body()));
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["mark", "--date", "2025-12-03", "--status", "99=present"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("99"));

    let requests = log.lock().unwrap();
    assert!(requests.iter().all(|r| r.method == "GET"));
}

#[test]
fn test_mark_negative_balance_needs_yes() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|request, _| {
        if request.method == "POST" {
            (200, saved_body())
        } else {
            (200, roster_body())
        }
    });
    let config = write_config(dir.path(), &base_url);

    let declined = rollcall(&config)
        .args(["mark", "--date", "2025-12-03", "--extra", "2=+1"])
        .output()
        .expect("run rollcall");
    assert_eq!(declined.status.code(), Some(4));
    assert!(log.lock().unwrap().iter().all(|r| r.method == "GET"));

    let confirmed = rollcall(&config)
        .args(["mark", "--date", "2025-12-03", "--extra", "2=+1", "--yes"])
        .output()
        .expect("run rollcall");
    assert!(confirmed.status.success(), "stderr: {}", stderr(&confirmed));
    assert!(log.lock().unwrap().iter().any(|r| r.method == "POST"));
}

#[test]
fn test_mark_rejects_malformed_assignment_before_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|_, _| (200, roster_body()));
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["mark", "--status", "1:late"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(4));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_mark_refuses_date_before_minimum() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|request, _| {
        if request.method == "POST" {
            (200, saved_body())
        } else {
            (200, roster_body())
        }
    });
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["mark", "--date", "2025-11-20", "--status", "1=absent", "--yes"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("2025-11-20"), "stderr: {}", err);
    assert!(err.contains("2025-12-01"), "stderr: {}", err);

    let requests = log.lock().unwrap();
    assert!(requests.iter().all(|r| r.method == "GET"));
}

#[test]
fn test_roster_unknown_format_lists_choices() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|_, _| (200, roster_body()));
    let config = write_config(dir.path(), &base_url);

    let output = rollcall(&config)
        .args(["roster", "--format", "csv"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("table, plain, json"));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_session_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let (base_url, log) = spawn_server(|request, _| {
        if request.method == "POST" {
            (200, saved_body())
        } else {
            (200, roster_body())
        }
    });
    let config = write_config(dir.path(), &base_url);

    let mut child = rollcall(&config)
        .args(["session", "--date", "2025-12-03"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn rollcall");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"mark 1 excused\npending\nsave\nquit\n")
        .expect("write commands");
    let output = child.wait_with_output().expect("wait rollcall");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("1 Petrova Anna: Excused"));
    assert!(out.contains("1 EXCUSED 0 Petrova Anna"));

    let requests = log.lock().unwrap();
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["GET", "POST", "GET"]);
}

#[test]
fn test_missing_explicit_config_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let output = rollcall(&dir.path().join("nope.toml"))
        .args(["roster"])
        .output()
        .expect("run rollcall");
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("Config file not found"));
}

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollcall").join("config.toml");

    let output = Command::new(bin())
        .env_remove("ROLLCALL_CONFIG")
        .env_remove("ROLLCALL_SERVER")
        .env("XDG_CONFIG_HOME", dir.path())
        .args([
            "--server",
            "http://school.example",
            "init",
            "--min-date",
            "2025-12-01",
            "--timezone",
            "Europe/Moscow",
        ])
        .output()
        .expect("run rollcall");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let contents = std::fs::read_to_string(&path).expect("config written");
    assert!(contents.contains("http://school.example"));
    assert!(contents.contains("Europe/Moscow"));

    let again = Command::new(bin())
        .env_remove("ROLLCALL_CONFIG")
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["init"])
        .output()
        .expect("run rollcall");
    assert_eq!(again.status.code(), Some(4));
}

#[test]
fn test_completions_bash() {
    let output = Command::new(bin())
        .args(["completions", "bash"])
        .output()
        .expect("run rollcall");
    assert!(output.status.success());
    assert!(stdout(&output).contains("rollcall"));
}
