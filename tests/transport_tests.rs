//! Built-in transports against a local one-shot HTTP server

#![cfg(any(feature = "hyper", feature = "reqwest"))]

use jsonfetch::client::ApiClient;
use jsonfetch::token::StaticToken;
use jsonfetch::{ApiResponse, Method, Request};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve a single response and return the base URL to reach it
async fn serve_once(status: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&received[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= end + 4 + length {
                    break;
                }
            }
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

fn executor<C: Request>(base_url: String) -> ApiClient<C> {
    ApiClient::from_client(C::new())
        .with_base_url(base_url)
        .with_token_provider(StaticToken::new("secret"))
}

#[cfg(feature = "hyper")]
mod hyper_transport {
    use super::*;
    use jsonfetch::request::HyperClient;

    #[tokio::test]
    async fn error_body_with_invalid_utf8_is_reported_lossily() {
        let base = serve_once("500 Internal Server Error", b"bad \xff\xfe!!").await;
        let api = executor::<HyperClient>(base);

        let response: ApiResponse<Value> = api.get("/broken").await;

        assert_eq!(response.data, None);
        assert_eq!(response.error.as_deref(), Some("bad \u{FFFD}\u{FFFD}!!"));
        assert!(!api.loading().get());
    }

    #[tokio::test]
    async fn success_body_with_invalid_utf8_is_decoded_lossily() {
        let base = serve_once("200 OK", b"ok \xff").await;
        let api = executor::<HyperClient>(base);

        let response = api.request_text("/text", Method::Get, None::<&()>).await;

        assert_eq!(response.data.as_deref(), Some("ok \u{FFFD}"));
    }

    #[tokio::test]
    async fn json_round_trip_over_http() {
        let base = serve_once("201 Created", br#"{"id":5}"#).await;
        let api = executor::<HyperClient>(base);

        let response: ApiResponse<Value> = api.post("/items", &serde_json::json!({ "name": "x" })).await;

        assert_eq!(response.data, Some(serde_json::json!({ "id": 5 })));
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use super::*;

    #[tokio::test]
    async fn error_body_with_invalid_utf8_is_reported_lossily() {
        let base = serve_once("500 Internal Server Error", b"bad \xff\xfe!!").await;
        let api = executor::<reqwest::Client>(base);

        let response: ApiResponse<Value> = api.get("/broken").await;

        assert_eq!(response.error.as_deref(), Some("bad \u{FFFD}\u{FFFD}!!"));
    }

    #[tokio::test]
    async fn bad_token_is_not_reported_as_a_url_error() {
        let api = executor::<reqwest::Client>("http://127.0.0.1:9".to_string())
            .with_token_provider(StaticToken::new("bad\ntoken"));

        let response: ApiResponse<Value> = api.get("/me").await;

        let error = response.error.unwrap();
        assert!(!error.starts_with("Invalid URL"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn unparsable_url_is_reported_as_such() {
        let api = executor::<reqwest::Client>("not a url".to_string());

        let response: ApiResponse<Value> = api.get("/me").await;

        assert!(response.error.unwrap().starts_with("Invalid URL"));
    }
}
