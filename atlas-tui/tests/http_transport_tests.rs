use atlas_core::{ErrorKind, ModelKey, OperationKind, Request, Response, Transport, GENERIC_ERROR_MESSAGE};
use atlas_test_utils::{analyze_topic_json, error_json};
use atlas_tui::api_client::{RestClient, TUNNEL_BYPASS_HEADER};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One canned HTTP reply.
struct Reply {
    status: &'static str,
    content_type: &'static str,
    body: String,
}

impl Reply {
    fn json(status: &'static str, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }
}

/// Serve `replies` one connection at a time and hand back each raw request.
async fn serve(replies: Vec<Reply>) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        for reply in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut socket).await;
            let _ = tx.send(raw);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.content_type,
                reply.body.len(),
                reply.body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });
    (base_url, rx)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Value of the first header named `name`, compared case-insensitively.
fn header(raw: &str, name: &str) -> Option<String> {
    let (head, _) = raw.split_once("\r\n\r\n")?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

fn body_of(raw: &str) -> serde_json::Value {
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn analyze_round_trip_over_http() {
    let (base_url, mut requests) =
        serve(vec![Reply::json("200 OK", analyze_topic_json("1. Heading\nBody text"))]).await;
    let client = RestClient::with_options(&base_url, None, true).unwrap();

    let response = client
        .send(Request::analyze("Arctic shipping", ModelKey::Mistral))
        .await
        .unwrap();
    assert_eq!(response.operation(), OperationKind::Analyze);
    assert_eq!(response.primary_text(), "1. Heading\nBody text");

    let raw = requests.recv().await.unwrap();
    assert!(raw.starts_with("POST /analyze_topic "));
    assert_eq!(header(&raw, "content-type"), Some("application/json".to_string()));
    assert_eq!(header(&raw, "accept"), Some("application/json".to_string()));
    assert!(raw.to_ascii_lowercase().contains(TUNNEL_BYPASS_HEADER));
    assert_eq!(
        body_of(&raw),
        serde_json::json!({ "topic": "Arctic shipping", "model": "mistral" })
    );
}

#[tokio::test]
async fn ask_posts_question_only() {
    let (base_url, mut requests) = serve(vec![Reply::json(
        "200 OK",
        r#"{"response":"Hello.","chosen_role":"moderator"}"#.to_string(),
    )])
    .await;
    let client = RestClient::with_options(&base_url, None, false).unwrap();

    let response = client.send(Request::ask("hi")).await.unwrap();
    assert_eq!(response.role().map(|r| r.as_str()), Some("moderator"));

    let raw = requests.recv().await.unwrap();
    assert!(raw.starts_with("POST /ask_agent "));
    assert_eq!(header(&raw, "content-type"), Some("application/json".to_string()));
    assert!(!raw.to_ascii_lowercase().contains(TUNNEL_BYPASS_HEADER));
    assert_eq!(body_of(&raw), serde_json::json!({ "question": "hi" }));
}

#[tokio::test]
async fn debate_transcript_keeps_server_order() {
    let body = r#"{
        "status": "success",
        "final_synthesis": "Done.",
        "debate_transcript": { "skeptic": "No.", "advocate": "Yes.", "moderator": "Hm." },
        "audit_report": "Fair."
    }"#;
    let (base_url, _requests) = serve(vec![Reply::json("200 OK", body.to_string())]).await;
    let client = RestClient::with_options(&base_url, None, false).unwrap();

    let response = client
        .send(Request::debate("Nuclear power", ModelKey::Llama3))
        .await
        .unwrap();
    match response {
        Response::DebateReport { transcript, .. } => {
            let roles: Vec<&str> = transcript.iter().map(|e| e.role.as_str()).collect();
            assert_eq!(roles, vec!["skeptic", "advocate", "moderator"]);
        }
        other => panic!("expected debate report, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let (base_url, _requests) =
        serve(vec![Reply::json("500 Internal Server Error", error_json("boom"))]).await;
    let client = RestClient::with_options(&base_url, None, false).unwrap();

    let err = client
        .send(Request::analyze("topic", ModelKey::Llama3))
        .await
        .unwrap_err();
    assert_eq!(err.message, "boom");
    assert_eq!(err.kind, ErrorKind::Http { status: 500 });
}

#[tokio::test]
async fn html_error_page_falls_back_to_generic_message() {
    let (base_url, _requests) = serve(vec![Reply {
        status: "502 Bad Gateway",
        content_type: "text/html",
        body: "<html><body>Bad Gateway</body></html>".to_string(),
    }])
    .await;
    let client = RestClient::with_options(&base_url, None, false).unwrap();

    let err = client
        .send(Request::ask("anyone there?"))
        .await
        .unwrap_err();
    assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    assert_eq!(err.kind, ErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RestClient::with_options(&format!("http://{}", addr), None, false).unwrap();
    let err = client
        .send(Request::analyze("topic", ModelKey::Gemma))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn configured_timeout_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let client = RestClient::with_options(
        &format!("http://{}", addr),
        Some(Duration::from_millis(100)),
        false,
    )
    .unwrap();
    let err = client
        .send(Request::analyze("topic", ModelKey::Llama3))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

#[tokio::test]
async fn status_check_reads_welcome() {
    let (base_url, mut requests) = serve(vec![Reply::json(
        "200 OK",
        r#"{"status":"success","message":"Welcome to the ATLAS API Server!"}"#.to_string(),
    )])
    .await;
    let client = RestClient::with_options(&base_url, None, false).unwrap();

    let status = client.status().await.unwrap();
    assert!(status.is_ok());
    let raw = requests.recv().await.unwrap();
    assert!(raw.starts_with("GET / "));
}
