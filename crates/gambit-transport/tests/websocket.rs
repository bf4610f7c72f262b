//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a plain `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use gambit_transport::{Connection, Transport, WebSocketConnection, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on port 0, connects one client, and returns both ends.
    async fn connected_pair() -> (WebSocketConnection, ClientWs) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have an address");
        assert_ne!(addr.port(), 0);

        let server = tokio::spawn(async move { transport.accept().await.expect("should accept") });
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        let conn = server.await.expect("task should complete");
        (conn, client)
    }

    #[tokio::test]
    async fn test_websocket_text_roundtrip() {
        let (conn, mut client) = connected_pair().await;
        assert!(conn.id().into_inner() > 0);
        assert!(conn.peer_addr().ip().is_loopback());

        conn.send("hello from server").await.expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "hello from server");

        client
            .send(Message::Text("hello from client".into()))
            .await
            .unwrap();
        let received = conn.recv().await.expect("recv should succeed");
        assert_eq!(received.as_deref(), Some("hello from client"));

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_binary_utf8_accepted() {
        let (conn, mut client) = connected_pair().await;

        client
            .send(Message::Binary(b"{\"x\":1}".to_vec().into()))
            .await
            .unwrap();

        let received = conn.recv().await.unwrap();
        assert_eq!(received.as_deref(), Some("{\"x\":1}"));
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (conn, mut client) = connected_pair().await;

        client.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_send_not_blocked_by_pending_recv() {
        let (conn, mut client) = connected_pair().await;
        let conn = Arc::new(conn);

        // Park a reader; the client sends nothing yet.
        let reader = {
            let conn = Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(2), conn.send("while reading"))
            .await
            .expect("send must not wait for the reader")
            .expect("send should succeed");
        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "while reading");

        client.send(Message::Text("done".into())).await.unwrap();
        let received = reader.await.unwrap().unwrap();
        assert_eq!(received.as_deref(), Some("done"));
    }
}
