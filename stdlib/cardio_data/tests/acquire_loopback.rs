use cardio_data::{Acquirer, FetchError};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// Serve a single canned HTTP response and hand the raw request back.
fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/processed.cleveland.data", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let head = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
        tx.send(String::from_utf8_lossy(&request).into_owned()).unwrap();
    });
    (url, rx)
}

fn loopback_acquirer() -> Acquirer {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    Acquirer::with_client(client)
}

#[test]
fn downloads_body_verbatim_with_browser_agent() {
    let body: &'static [u8] = b"63.0,1.0,1.0,145.0,233.0,1.0,2.0,150.0,0.0,2.3,3.0,0.0,6.0,0\n";
    let (url, requests) = serve_once("200 OK", body);
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("heart.csv");
    std::fs::write(&path, b"stale contents").unwrap();

    let written = loopback_acquirer().download(&url, &path).unwrap();

    assert_eq!(written, body.len());
    assert_eq!(std::fs::read(&path).unwrap(), body);
    let request = requests.recv().unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /processed.cleveland.data"), "{request}");
    assert!(request.contains("user-agent: mozilla/5.0"), "{request}");
}

#[test]
fn non_200_status_is_reported_and_nothing_written() {
    let (url, _requests) = serve_once("404 Not Found", b"");
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("heart.csv");

    match loopback_acquirer().download(&url, &path) {
        Err(FetchError::Status(code)) => assert_eq!(code, 404),
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn connection_failure_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let err = loopback_acquirer().fetch(&url).unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}
