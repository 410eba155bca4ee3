use mockito::Matcher;
use rawreplay::config::ReplayOptions;
use rawreplay::errors::ReplayError;
use rawreplay::execute::replay_with;
use rawreplay::http_request_executor::TransportSession;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn request_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("request.txt");
    fs::write(&path, contents).unwrap();
    path
}

fn options(path: PathBuf, host: &str) -> ReplayOptions {
    let mut options = ReplayOptions::new(path);
    options.substitutions.insert("host".to_string(), host.to_string());
    options
}

fn replay_to_string(session: &TransportSession, options: &ReplayOptions) -> String {
    let mut out = Vec::new();
    replay_with(session, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn replays_get_with_substituted_host() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/items/42")
        .match_header("x-trace", "abc")
        .with_status(200)
        .with_body("ok")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = request_file(&dir, "GET /items/{{id}} HTTP/1.1\nHost: {{host}}\nX-Trace: abc\n\n");
    let mut options = options(path, &server.host_with_port());
    options.substitutions.insert("id".to_string(), "42".to_string());

    let session = TransportSession::new(None).unwrap();
    assert_eq!(replay_to_string(&session, &options), "200 OK\n");
    mock.assert();
}

#[test]
fn surfaces_first_redirect() {
    let mut server = mockito::Server::new();
    let redirect = server
        .mock("GET", "/old")
        .with_status(302)
        .with_header("location", "/new")
        .create();
    let target = server.mock("GET", "/new").with_status(200).expect(0).create();

    let dir = tempfile::tempdir().unwrap();
    let path = request_file(&dir, "GET /old HTTP/1.1\nHost: {{host}}\n\n");
    let session = TransportSession::new(None).unwrap();
    assert_eq!(replay_to_string(&session, &options(path, &server.host_with_port())), "302 Found\n");
    redirect.assert();
    target.assert();
}

#[test]
fn form_params_are_sent_as_query_and_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", Matcher::Regex(r"^/login".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user".into(), "alice".into()),
            Matcher::UrlEncoded("pass".into(), "x".into()),
        ]))
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("user=alice&pass=x")
        .with_status(204)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = request_file(
        &dir,
        "POST /login HTTP/1.1\n\
         Host: {{host}}\n\
         Content-Type: application/x-www-form-urlencoded\n\
         Content-Length: 999\n\
         \n\
         user=alice&pass=x\n",
    );
    let session = TransportSession::new(None).unwrap();
    assert_eq!(replay_to_string(&session, &options(path, &server.host_with_port())), "204 No Content\n");
    mock.assert();
}

#[test]
fn dumps_full_response() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/thing")
        .match_body("payload")
        .with_status(201)
        .with_header("x-custom", "yes")
        .with_body("created")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let path = request_file(&dir, "PUT /thing HTTP/1.1\nHost: {{host}}\nContent-Type: text/plain\n\npayload\n");
    let mut options = options(path, &server.host_with_port());
    options.dump_response = true;

    let session = TransportSession::new(None).unwrap();
    let text = replay_to_string(&session, &options);
    assert!(text.starts_with("HTTP/1.1 201 Created\n"));
    assert!(text.contains("x-custom: yes\n"));
    assert!(text.ends_with("\n\ncreated\n"));
    mock.assert();
}

#[test]
fn session_keeps_cookies_between_replays() {
    let mut server = mockito::Server::new();
    let login = server
        .mock("GET", "/login")
        .with_status(200)
        .with_header("set-cookie", "sid=abc; Path=/")
        .create();
    let profile = server
        .mock("GET", "/profile")
        .match_header("cookie", "sid=abc")
        .with_status(200)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let host = server.host_with_port();
    let session = TransportSession::new(None).unwrap();

    let first = request_file(&dir, "GET /login HTTP/1.1\nHost: {{host}}\n\n");
    replay_to_string(&session, &options(first, &host));
    let second = request_file(&dir, "GET /profile HTTP/1.1\nHost: {{host}}\n\n");
    assert_eq!(replay_to_string(&session, &options(second, &host)), "200 OK\n");

    login.assert();
    profile.assert();
}

#[test]
fn saves_request_as_sent() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/echo").with_status(200).create();

    let dir = tempfile::tempdir().unwrap();
    let path = request_file(&dir, "POST /echo HTTP/1.1\nHost: {{host}}\nContent-Type: text/plain\n\nhello\n");
    let saved = dir.path().join("sent.txt");
    let mut options = options(path, &server.host_with_port());
    options.save_request = Some(saved.clone());

    let session = TransportSession::new(None).unwrap();
    replay_to_string(&session, &options);
    mock.assert();

    let text = fs::read_to_string(saved).unwrap();
    assert!(text.starts_with("POST /echo HTTP/1.1\n"));
    assert!(text.contains(&format!("Host: {}\n", server.host_with_port())));
    assert!(text.contains("content-type: text/plain\n"));
    assert!(text.contains("\nhello\n\n"));
}

#[test]
fn missing_request_file_is_reported() {
    let session = TransportSession::new(None).unwrap();
    let options = ReplayOptions::new(PathBuf::from("/nonexistent/request.txt"));
    let err = replay_with(&session, &options, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/request.txt"));
    assert!(matches!(err.downcast_ref::<ReplayError>(), Some(ReplayError::Io { .. })));
}

#[test]
fn malformed_request_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = request_file(&dir, "GET /only-two-tokens\n\n");
    let session = TransportSession::new(None).unwrap();
    let err = replay_with(&session, &ReplayOptions::new(path.clone()), &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains(&path.display().to_string()));
    assert!(format!("{:#}", err).contains("malformed request supplied"));
}

#[test]
fn invalid_proxy_is_rejected() {
    assert!(TransportSession::new(Some("::not a url::")).is_err());
}
