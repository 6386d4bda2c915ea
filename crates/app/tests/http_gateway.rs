//! `HttpGateway` against a local stub server.

use std::{io, net::SocketAddr};

use serde_json::json;
use testresult::TestResult;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

use quire_app::gateway::{Gateway, GatewayError, HttpGateway, Method, Payload};

type Requests = JoinHandle<io::Result<Vec<String>>>;

/// Answer one connection per canned response, collecting each request head.
async fn serve(responses: Vec<String>) -> TestResult<(SocketAddr, Requests)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let requests = tokio::spawn(async move {
        let mut heads = Vec::new();

        for response in responses {
            let (mut stream, _) = listener.accept().await?;

            heads.push(read_request(&mut stream).await?);

            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;
        }

        Ok(heads)
    });

    Ok((addr, requests))
}

async fn read_request(stream: &mut TcpStream) -> io::Result<String> {
    let mut buf = Vec::new();

    loop {
        if let Some(end) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(buf.get(..end).unwrap_or_default()).into_owned();
            let wanted = end + 4 + content_length(&head);

            while buf.len() < wanted && stream.read_buf(&mut buf).await? > 0 {}

            return Ok(head);
        }

        if stream.read_buf(&mut buf).await? == 0 {
            return Ok(String::from_utf8_lossy(&buf).into_owned());
        }
    }
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn response(status: &str, content_type: &str, headers: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n{headers}\r\n{body}",
        body.len()
    )
}

fn gateway(addr: SocketAddr) -> TestResult<HttpGateway> {
    Ok(HttpGateway::new(&format!("http://{addr}/api"))?)
}

#[tokio::test]
async fn server_errors_keep_status_and_body() -> TestResult {
    let (addr, requests) = serve(vec![response(
        "500 Internal Server Error",
        "text/plain",
        "",
        "Database unavailable",
    )])
    .await?;

    let result = gateway(addr)?.send(Method::Get, "/bills", None).await;

    assert!(matches!(
        result,
        Err(GatewayError::RequestFailed { status: 500, ref body }) if body == "Database unavailable"
    ));

    requests.await??;

    Ok(())
}

#[tokio::test]
async fn json_responses_are_decoded() -> TestResult {
    let (addr, requests) = serve(vec![response(
        "200 OK",
        "application/json;charset=UTF-8",
        "",
        r#"{"id":3,"name":"Dune"}"#,
    )])
    .await?;

    let payload = gateway(addr)?.send(Method::Get, "/items/3", None).await?;

    assert_eq!(payload, Payload::Json(json!({"id": 3, "name": "Dune"})));

    let heads = requests.await??;

    assert!(heads.first().is_some_and(|head| head.starts_with("GET /api/items/3 HTTP/1.1")));

    Ok(())
}

#[tokio::test]
async fn session_cookies_are_sent_back() -> TestResult {
    let (addr, requests) = serve(vec![
        response(
            "200 OK",
            "application/json",
            "Set-Cookie: JSESSIONID=abc123; Path=/; HttpOnly\r\n",
            r#"{"id":1,"username":"clerk","role":"STAFF"}"#,
        ),
        response("200 OK", "application/json", "", "[]"),
    ])
    .await?;

    let gateway = gateway(addr)?;

    gateway
        .send(
            Method::Post,
            "/auth/login",
            Some(json!({"username": "clerk", "password": "secret1"})),
        )
        .await?;
    gateway.send(Method::Get, "/items", None).await?;

    let heads = requests.await??;

    assert_eq!(heads.len(), 2);
    assert!(
        heads
            .first()
            .is_some_and(|head| !head.to_ascii_lowercase().contains("\r\ncookie:"))
    );
    assert!(heads.last().is_some_and(|head| {
        head.to_ascii_lowercase()
            .contains("\r\ncookie: jsessionid=abc123")
    }));

    Ok(())
}
