use super::*;

// =============================================================================
// classify_status
// =============================================================================

#[test]
fn success_statuses() {
    assert_eq!(classify_status(200), AuthOutcome::Success);
    assert_eq!(classify_status(204), AuthOutcome::Success);
}

#[test]
fn credential_rejections() {
    assert_eq!(classify_status(401), AuthOutcome::InvalidCredentials);
    assert_eq!(classify_status(403), AuthOutcome::InvalidCredentials);
}

#[test]
fn server_failures() {
    assert_eq!(classify_status(500), AuthOutcome::ServerError);
    assert_eq!(classify_status(503), AuthOutcome::ServerError);
}

#[test]
fn everything_else_is_unknown() {
    for status in [301, 400, 404, 418, 429] {
        assert_eq!(classify_status(status), AuthOutcome::Unknown, "status {status}");
    }
}

// =============================================================================
// login
// =============================================================================

#[test]
fn new_keeps_url() {
    let auth = HttpAuthenticator::new("http://127.0.0.1:9/login", Duration::from_secs(1)).unwrap();
    assert_eq!(auth.url(), "http://127.0.0.1:9/login");
    assert!(!auth.is_authenticated());
}

/// Serve one canned response on loopback and hand back the raw request.
async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/login", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending a full request");
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_owned()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        let response = format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8(request).unwrap()
    });
    (url, server)
}

#[tokio::test]
async fn ok_response_authenticates_session() {
    let (url, server) = serve_once("HTTP/1.1 200 OK").await;
    let auth = HttpAuthenticator::new(url, Duration::from_secs(5)).unwrap();

    let outcome = auth.login("test@example.com", "Password123").await;

    assert_eq!(outcome, AuthOutcome::Success);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_identifier().as_deref(), Some("test@example.com"));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /login "));
    assert!(request.contains(r#""identifier":"test@example.com""#));
    assert!(request.contains(r#""secret":"Password123""#));
}

#[tokio::test]
async fn unauthorized_response_leaves_session_cleared() {
    let (url, server) = serve_once("HTTP/1.1 401 Unauthorized").await;
    let auth = HttpAuthenticator::new(url, Duration::from_secs(5)).unwrap();

    let outcome = auth.login("test@example.com", "wrongpass").await;

    assert_eq!(outcome, AuthOutcome::InvalidCredentials);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.current_identifier(), None);
    server.await.unwrap();
}

#[tokio::test]
async fn unavailable_response_is_server_error() {
    let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable").await;
    let auth = HttpAuthenticator::new(url, Duration::from_secs(5)).unwrap();

    assert_eq!(auth.login("test@example.com", "Password123").await, AuthOutcome::ServerError);
    assert!(!auth.is_authenticated());
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/login", listener.local_addr().unwrap());
    drop(listener);

    let auth = HttpAuthenticator::new(url, Duration::from_secs(2)).unwrap();
    let outcome = auth.login("test@example.com", "Password123").await;
    assert_eq!(outcome, AuthOutcome::NetworkError);
    assert!(!auth.is_authenticated());
}
