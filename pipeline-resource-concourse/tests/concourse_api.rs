//! `ConcourseClient` against a canned HTTP server on 127.0.0.1.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use pipeline_resource_check::{fingerprint, CheckCommand, CheckError, LogStore};
use pipeline_resource_concourse::{ConcourseClient, ConcourseSession};
use pipeline_resource_core::{
    CheckRequest, Connector, ConnectorError, Directory, LoginRequest, PipelineName, Source, Team,
    TeamName,
};

// ---------------------------------------------------------------------------
// Mock server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    authorization: Option<String>,
    body: String,
}

struct MockServer {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    /// Serve `routes` keyed by `"METHOD /path"` until the test process exits.
    /// Unknown routes answer 404.
    fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(k, status, body)| (k.to_string(), (status, body.to_string())))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();

                let mut content_length = 0usize;
                let mut authorization = None;
                loop {
                    let mut header = String::new();
                    if reader.read_line(&mut header).is_err()
                        || header == "\r\n"
                        || header.is_empty()
                    {
                        break;
                    }
                    if let Some((name, value)) = header.trim_end().split_once(':') {
                        let value = value.trim().to_string();
                        match name.to_ascii_lowercase().as_str() {
                            "content-length" => content_length = value.parse().unwrap_or(0),
                            "authorization" => authorization = Some(value),
                            _ => {}
                        }
                    }
                }
                let mut body = vec![0u8; content_length];
                let _ = reader.read_exact(&mut body);

                recorded.lock().unwrap().push(Recorded {
                    method: method.clone(),
                    path: path.clone(),
                    authorization,
                    body: String::from_utf8_lossy(&body).into_owned(),
                });

                let (status, payload) = routes
                    .get(&format!("{method} {path}"))
                    .cloned()
                    .unwrap_or((404, "not found".to_string()));
                let response = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
                    payload.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests,
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

const TOKEN_OK: &str = r#"{"access_token":"access-abc","token_type":"bearer","id_token":"id-xyz"}"#;

fn login(
    client: &ConcourseClient,
    target: &str,
    password: &str,
) -> Result<ConcourseSession, ConnectorError> {
    let team = TeamName::from("main");
    client.login(LoginRequest {
        target,
        team: &team,
        username: "admin",
        password,
        insecure: false,
    })
}

// ---------------------------------------------------------------------------
// 1. Login
// ---------------------------------------------------------------------------

#[test]
fn login_posts_password_grant_as_fly_client() {
    let server = MockServer::start(vec![("POST /sky/issuer/token", 200, TOKEN_OK)]);
    let client = ConcourseClient::new();

    let session = login(&client, &server.base_url, "s3cret").expect("login");

    assert_eq!(session.team(), &TeamName::from("main"));
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].authorization.as_deref(), Some("Basic Zmx5OlpteDU="));
    assert!(requests[0].body.contains("grant_type=password"), "body: {}", requests[0].body);
    assert!(requests[0].body.contains("username=admin"));
    assert!(requests[0].body.contains("password=s3cret"));
}

#[test]
fn login_rejection_is_a_status_error() {
    let server = MockServer::start(vec![(
        "POST /sky/issuer/token",
        401,
        r#"{"error":"invalid_grant"}"#,
    )]);
    let client = ConcourseClient::new();

    let err = login(&client, &server.base_url, "wrong").unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("invalid_grant"), "got: {err}");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ConcourseClient::new();

    let err = login(&client, &format!("http://127.0.0.1:{port}"), "pw").unwrap_err();

    assert!(matches!(err, ConnectorError::Transport { .. }), "got: {err}");
}

#[test]
fn garbage_token_response_is_a_decode_error() {
    let server = MockServer::start(vec![("POST /sky/issuer/token", 200, "not json")]);
    let client = ConcourseClient::new();

    let err = login(&client, &server.base_url, "pw").unwrap_err();

    assert!(matches!(err, ConnectorError::Decode { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Listing and config retrieval
// ---------------------------------------------------------------------------

#[test]
fn list_and_fetch_use_session_token_and_team() {
    let server = MockServer::start(vec![
        ("POST /sky/issuer/token", 200, TOKEN_OK),
        (
            "GET /api/v1/teams/main/pipelines",
            200,
            r#"[{"id":1,"name":"p1","paused":false,"public":false,"team_name":"main"}]"#,
        ),
        ("GET /api/v1/teams/main/pipelines/p1/config", 200, r#"{"config":{"jobs":[]}}"#),
    ]);
    let client = ConcourseClient::new();

    // Trailing slash on the target is ignored.
    let session = login(&client, &format!("{}/", server.base_url), "pw").unwrap();
    let pipelines = client
        .list_pipelines(&session, &TeamName::from("main"))
        .unwrap();
    let config = client
        .pipeline_config(&session, &PipelineName::from("p1"))
        .unwrap();

    assert_eq!(pipelines.len(), 1);
    assert_eq!(pipelines[0].name, PipelineName::from("p1"));
    assert_eq!(config, br#"{"config":{"jobs":[]}}"#.to_vec());

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].path, "/sky/issuer/token");
    assert_eq!(requests[1].path, "/api/v1/teams/main/pipelines");
    assert_eq!(requests[2].path, "/api/v1/teams/main/pipelines/p1/config");
    for r in &requests[1..] {
        assert_eq!(r.method, "GET");
        assert_eq!(r.authorization.as_deref(), Some("Bearer id-xyz"));
    }
}

#[test]
fn missing_pipeline_config_is_a_status_error() {
    let server = MockServer::start(vec![("POST /sky/issuer/token", 200, TOKEN_OK)]);
    let client = ConcourseClient::new();
    let session = login(&client, &server.base_url, "pw").unwrap();

    let err = client
        .pipeline_config(&session, &PipelineName::from("nope"))
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
}

// ---------------------------------------------------------------------------
// 3. Full check over HTTP
// ---------------------------------------------------------------------------

struct NoLogs;

impl LogStore for NoLogs {
    fn list_logs(
        &self,
        _dir: &std::path::Path,
        _prefix: &str,
    ) -> std::io::Result<Vec<std::path::PathBuf>> {
        Ok(vec![])
    }

    fn remove(&self, _path: &std::path::Path) -> std::io::Result<()> {
        Ok(())
    }
}

fn check_request(target: &str, password: &str) -> CheckRequest {
    CheckRequest {
        source: Source {
            target: target.to_string(),
            insecure: String::new(),
            teams: vec![Team {
                name: TeamName::from("main"),
                username: "admin".to_string(),
                password: password.to_string(),
            }],
        },
        version: None,
    }
}

#[test]
fn check_fingerprints_raw_config_bodies() {
    let server = MockServer::start(vec![
        ("POST /sky/issuer/token", 200, TOKEN_OK),
        (
            "GET /api/v1/teams/main/pipelines",
            200,
            r#"[{"name":"p1"},{"name":"p2"}]"#,
        ),
        ("GET /api/v1/teams/main/pipelines/p1/config", 200, "abc"),
        ("GET /api/v1/teams/main/pipelines/p2/config", 200, "xyz"),
    ]);
    let client = ConcourseClient::new();

    let versions = CheckCommand::new("/logs/check.log", &client, &client)
        .with_log_store(NoLogs)
        .run(&check_request(&server.base_url, "pw"))
        .expect("check");

    assert_eq!(versions.len(), 2);
    assert_eq!(versions[&PipelineName::from("p1")], fingerprint(b"abc"));
    assert_eq!(versions[&PipelineName::from("p2")], fingerprint(b"xyz"));
}

#[test]
fn check_fails_on_rejected_login() {
    let server = MockServer::start(vec![("POST /sky/issuer/token", 401, "{}")]);
    let client = ConcourseClient::new();

    let err = CheckCommand::new("/logs/check.log", &client, &client)
        .with_log_store(NoLogs)
        .run(&check_request(&server.base_url, "bad"))
        .unwrap_err();

    assert!(matches!(err, CheckError::Login { .. }), "got: {err}");
    assert_eq!(server.requests().len(), 1);
}
