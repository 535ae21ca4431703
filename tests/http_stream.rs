use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use tutor_chat::client::{HttpConfig, HttpTransport, Transport};
use tutor_chat::core::{
    Conversation, Message, Outcome, StreamState, StreamingRequestController,
    SubmissionCoordinator, SubmitOutcome,
};

enum Reply {
    Chunked(Vec<Vec<u8>>),
    Status(u16),
}

/// Serves exactly one request and hands back its JSON body.
async fn serve_once(reply: Reply) -> (String, JoinHandle<serde_json::Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let endpoint = format!("http://{}/ask", listener.local_addr().expect("addr"));

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let body = read_request_body(&mut socket).await;

        match reply {
            Reply::Chunked(chunks) => {
                socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          Content-Type: text/plain; charset=utf-8\r\n\
                          Transfer-Encoding: chunked\r\n\
                          Connection: close\r\n\r\n",
                    )
                    .await
                    .expect("write head");
                for chunk in chunks {
                    let mut frame = format!("{:x}\r\n", chunk.len()).into_bytes();
                    frame.extend_from_slice(&chunk);
                    frame.extend_from_slice(b"\r\n");
                    socket.write_all(&frame).await.expect("write chunk");
                    socket.flush().await.expect("flush");
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                socket.write_all(b"0\r\n\r\n").await.expect("write end");
            }
            Reply::Status(code) => {
                let response = format!(
                    "HTTP/1.1 {code} Oops\r\nContent-Length: 5\r\nConnection: close\r\n\r\noops!"
                );
                socket.write_all(response.as_bytes()).await.expect("write");
            }
        }
        socket.shutdown().await.ok();

        serde_json::from_slice(&body).expect("json body")
    });

    (endpoint, handle)
}

async fn read_request_body(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.expect("read");
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    assert!(
        headers.lines().any(|l| l == "content-type: application/json"),
        "request must declare a JSON body: {headers}"
    );
    let content_length: usize = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().expect("content length"))
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.expect("read body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    buf[header_end..header_end + content_length].to_vec()
}

fn transport(endpoint: &str) -> Arc<dyn Transport> {
    let config = HttpConfig::new().with_timeout(Duration::from_secs(5));
    Arc::new(HttpTransport::with_config(endpoint, config).expect("transport"))
}

async fn run_turn(endpoint: &str, before: &Conversation, text: &str) -> (Vec<Conversation>, StreamState) {
    let mut stream =
        StreamingRequestController::new(transport(endpoint)).run(before, Message::user(text));
    let mut snapshots = Vec::new();
    while let Some(snapshot) = stream.next().await {
        snapshots.push(snapshot);
    }
    (snapshots, stream.state())
}

#[tokio::test]
async fn streams_multibyte_text_split_across_chunks() {
    let crab = "🦀".as_bytes();
    let (endpoint, server) = serve_once(Reply::Chunked(vec![
        b"Rust ".to_vec(),
        [b"is ".as_slice(), &crab[..2]].concat(),
        [&crab[2..], b" fun".as_slice()].concat(),
    ]))
    .await;

    let (snapshots, state) = run_turn(&endpoint, &Conversation::new(), "Is Rust fun?").await;

    assert_eq!(state, StreamState::Settled(Outcome::Success));
    let last = snapshots.last().expect("snapshots");
    assert_eq!(
        last.messages(),
        [Message::user("Is Rust fun?"), Message::assistant("Rust is 🦀 fun")]
    );
    assert!(snapshots.iter().all(|s| s.len() == 2));
    assert!(
        snapshots
            .iter()
            .all(|s| !s.messages()[1].content.contains('\u{FFFD}'))
    );

    let body = server.await.expect("server");
    assert_eq!(body["message"], "Is Rust fun?");
    assert_eq!(body["history"][0]["role"], "user");
    assert_eq!(body["history"][0]["content"], "Is Rust fun?");
}

#[tokio::test]
async fn sends_prior_history_in_order() {
    let (endpoint, server) = serve_once(Reply::Chunked(vec![b"Yes.".to_vec()])).await;
    let before = Conversation::from(vec![
        Message::user("What is 2 + 2?"),
        Message::assistant("4"),
    ]);

    let (snapshots, _) = run_turn(&endpoint, &before, "Are you sure?").await;
    assert_eq!(snapshots.last().expect("snapshot").len(), 4);

    let body = server.await.expect("server");
    let history = body["history"].as_array().expect("history array");
    assert_eq!(history.len(), 3);
    assert_eq!(history[1]["role"], "assistant");
    assert_eq!(history[2]["content"], "Are you sure?");
    assert!(body.get("user_id").is_none());
}

#[tokio::test]
async fn server_error_becomes_error_snapshot() {
    let (endpoint, server) = serve_once(Reply::Status(500)).await;

    let (snapshots, state) = run_turn(&endpoint, &Conversation::new(), "hello").await;

    assert_eq!(state, StreamState::Settled(Outcome::Error));
    assert_eq!(snapshots.len(), 1);
    assert_eq!(
        snapshots[0].messages()[1],
        Message::assistant("Error: HTTP error! Status: 500")
    );
    server.await.expect("server");
}

#[tokio::test]
async fn truncated_character_keeps_partial_text() {
    let crab = "🦀".as_bytes();
    let (endpoint, server) = serve_once(Reply::Chunked(vec![
        b"Almost ".to_vec(),
        crab[..3].to_vec(),
    ]))
    .await;

    let (snapshots, state) = run_turn(&endpoint, &Conversation::new(), "hi").await;

    assert_eq!(state, StreamState::Settled(Outcome::Error));
    let reply = &snapshots.last().expect("snapshot").messages()[1].content;
    assert!(reply.starts_with("Almost \n\nError: "), "{reply}");
    server.await.expect("server");
}

#[tokio::test]
async fn refused_connection_becomes_error_snapshot() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let endpoint = format!("http://{}/ask", listener.local_addr().expect("addr"));
    drop(listener);

    let (snapshots, state) = run_turn(&endpoint, &Conversation::new(), "Explain recursion").await;

    assert_eq!(state, StreamState::Settled(Outcome::Error));
    assert_eq!(snapshots.len(), 1);
    let reply = &snapshots[0].messages()[1];
    assert!(reply.is_assistant());
    assert!(reply.content.starts_with("Error: "), "{}", reply.content);
}

#[tokio::test]
async fn coordinator_drives_a_real_exchange() {
    let (endpoint, server) = serve_once(Reply::Chunked(vec![
        b"Hey ".to_vec(),
        b"there!".to_vec(),
    ]))
    .await;

    let mut coordinator =
        SubmissionCoordinator::new(transport(&endpoint)).with_user_id(Some("student-7".into()));
    assert_eq!(coordinator.submit("Hello"), SubmitOutcome::Accepted);
    coordinator.wait_until_idle().await;

    assert_eq!(
        coordinator.snapshot().messages(),
        [Message::user("Hello"), Message::assistant("Hey there!")]
    );
    assert_eq!(coordinator.last_outcome(), Some(Outcome::Success));

    let body = server.await.expect("server");
    assert_eq!(body["user_id"], "student-7");
}
