//! `HttpSlideSource` against a loopback server that answers one request.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use scrolldeck::loader::{LoadState, SlideLoader};
use scrolldeck::source::{HttpSlideSource, SlideSource, SourceError};
use std::sync::Arc;

/// Serve a single canned response and hand back the request line.
fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request_line
    });
    (endpoint, handle)
}

#[test]
fn test_fetches_ordered_list() {
    let body = r#"[
        {"id": 1, "title": "Slide 1", "url": "/slides/1.html", "order": 1},
        {"id": 2, "title": "Slide 2", "url": "/slides/2.html", "order": 2}
    ]"#;
    let (endpoint, server) = serve_once("200 OK", body);
    let source = HttpSlideSource::new(format!("{endpoint}/"));

    let slides = source.list_slides().unwrap();
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[0].title, "Slide 1");
    assert_eq!(slides[1].url, "/slides/2.html");

    let request_line = server.join().unwrap();
    assert!(request_line.starts_with("GET /api/slides "), "{request_line}");
}

#[test]
fn test_empty_list_is_ok() {
    let (endpoint, server) = serve_once("200 OK", "[]");
    let slides = HttpSlideSource::new(endpoint).list_slides().unwrap();
    assert!(slides.is_empty());
    server.join().unwrap();
}

#[test]
fn test_server_error_status() {
    let (endpoint, server) = serve_once("500 Internal Server Error", "{}");
    let err = HttpSlideSource::new(endpoint).list_slides().unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 500, .. }), "{err}");
    server.join().unwrap();
}

#[test]
fn test_malformed_body() {
    let (endpoint, server) = serve_once("200 OK", r#"{"slides": "nope"}"#);
    let err = HttpSlideSource::new(endpoint).list_slides().unwrap_err();
    assert!(matches!(err, SourceError::Malformed(_)), "{err}");
    server.join().unwrap();
}

#[test]
fn test_unsorted_list_is_rejected() {
    let body = r#"[
        {"id": 1, "title": "b", "url": "/b", "order": 5},
        {"id": 2, "title": "a", "url": "/a", "order": 1}
    ]"#;
    let (endpoint, server) = serve_once("200 OK", body);
    let err = HttpSlideSource::new(endpoint).list_slides().unwrap_err();
    assert!(matches!(err, SourceError::Unsorted { id: 2, position: 1 }), "{err}");
    server.join().unwrap();
}

#[test]
fn test_unreachable_endpoint() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = HttpSlideSource::new(endpoint).list_slides().unwrap_err();
    assert!(matches!(err, SourceError::Http { .. }), "{err}");
}

#[test]
fn test_loader_surfaces_failure_message() {
    let (endpoint, server) = serve_once("503 Service Unavailable", "");
    let mut loader = SlideLoader::start(Arc::new(HttpSlideSource::new(endpoint)));
    match loader.wait() {
        LoadState::Failed(message) => assert!(message.contains("503"), "{message}"),
        other => panic!("expected failure, got {other:?}"),
    }
    server.join().unwrap();
}
