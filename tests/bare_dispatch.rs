//! Dispatch of bare traffic to an upstream bare server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use uv_kiosk::KioskConfig;

mod common;

fn config_for(upstream: std::net::SocketAddr) -> KioskConfig {
    let mut config = KioskConfig::default();
    config.bare.upstream = format!("http://{}", upstream);
    config
}

#[tokio::test]
async fn bare_requests_are_relayed_upstream() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let upstream = common::start_programmable_backend(move |target| {
        recorder.lock().unwrap().push(target);
        async move { (200, r#"{"versions":["v3"]}"#.to_string()) }
    })
    .await;

    let (addr, shutdown) = common::start_kiosk(config_for(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/bare/v3/?probe=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"versions":["v3"]}"#);
    assert_eq!(*seen.lock().unwrap(), vec!["/bare/v3/?probe=1".to_string()]);

    shutdown.trigger();
}

#[tokio::test]
async fn bare_prefix_shadows_nothing_else() {
    let upstream = common::start_programmable_backend(|_target| async move {
        (404, "bare: no such route".to_string())
    })
    .await;

    let (addr, shutdown) = common::start_kiosk(config_for(upstream)).await;

    // Looks like an app route, but lives under the bare prefix.
    let res = common::client()
        .get(format!("http://{}/bare/uv/uv.config.js", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "bare: no such route");

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_bare_server_is_bad_gateway() {
    let upstream = common::closed_port().await;
    let (addr, shutdown) = common::start_kiosk(config_for(upstream)).await;

    let res = common::client()
        .get(format!("http://{}/bare/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(res.text().await.unwrap(), "Bare server unreachable");

    shutdown.trigger();
}

#[tokio::test]
async fn unmatched_upgrade_closes_connection_silently() {
    let (addr, shutdown) = common::start_kiosk(KioskConfig::default()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(common::upgrade_request("/").as_bytes())
        .await
        .unwrap();

    let mut received = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut received))
        .await
        .expect("connection was left open");
    assert!(received.is_empty(), "got {:?}", String::from_utf8_lossy(&received));

    shutdown.trigger();
}

#[tokio::test]
async fn bare_websocket_is_tunnelled() {
    let upstream = common::start_ws_echo().await;
    let (addr, shutdown) = common::start_kiosk(config_for(upstream)).await;

    let (mut ws, response) = tokio_tungstenite::connect_async(format!("ws://{}/bare/v3/", addr))
        .await
        .expect("upgrade through kiosk failed");
    assert_eq!(response.status(), 101);

    for text in ["hello through the kiosk", "second frame"] {
        ws.send(Message::text(text)).await.unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no echo")
            .expect("stream ended")
            .unwrap();
        assert_eq!(reply.to_text().unwrap(), text);
    }

    let _ = ws.close(None).await;
    shutdown.trigger();
}

#[tokio::test]
async fn declined_upgrade_is_relayed_as_is() {
    let upstream = common::start_programmable_backend(|_target| async move {
        (404, "bare: no websocket here".to_string())
    })
    .await;
    let (addr, shutdown) = common::start_kiosk(config_for(upstream)).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(common::upgrade_request("/bare/v3/").as_bytes())
        .await
        .unwrap();

    let response = common::read_until(&mut stream, "bare: no websocket here").await;
    assert!(response.starts_with("HTTP/1.1 404"), "got {response:?}");

    shutdown.trigger();
}

#[tokio::test]
async fn upgrade_to_unreachable_bare_server_is_bad_gateway() {
    let upstream = common::closed_port().await;
    let (addr, shutdown) = common::start_kiosk(config_for(upstream)).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(common::upgrade_request("/bare/v3/").as_bytes())
        .await
        .unwrap();

    let response = common::read_until(&mut stream, "Bare server unreachable").await;
    assert!(response.starts_with("HTTP/1.1 502"), "got {response:?}");

    shutdown.trigger();
}

#[tokio::test]
async fn tunnel_keeps_its_connection_slot() {
    let upstream = common::start_ws_echo().await;
    let mut config = config_for(upstream);
    config.listener.max_connections = 1;
    let (addr, shutdown) = common::start_kiosk(config).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/bare/v3/", addr))
        .await
        .unwrap();
    ws.send(Message::text("hold")).await.unwrap();
    let reply = ws.next().await.unwrap().unwrap();
    assert_eq!(reply.to_text().unwrap(), "hold");

    // The only slot belongs to the tunnel, so a second client is not served.
    let client = common::client();
    let url = format!("http://{}/uv.sw.js", addr);
    let blocked = tokio::time::timeout(Duration::from_millis(500), client.get(&url).send()).await;
    assert!(blocked.is_err(), "second connection was served past max_connections");

    let _ = ws.close(None).await;
    drop(ws);

    let res = tokio::time::timeout(Duration::from_secs(5), client.get(&url).send())
        .await
        .expect("slot was not released when the tunnel closed")
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
}
