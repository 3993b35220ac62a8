//! Connection transport.
//!
//! A transport opens one connection per call and reports its lifecycle as
//! `SocketEvent`s. The returned `Connection` closes it when closed or dropped.

use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::connect_async;
use tungstenite::Message;

use super::messages::{SocketEvent, SocketMsg};

/// Opens connections for the client actor.
pub trait Transport: Send + Sync {
    fn open(
        &self,
        url: &str,
        generation: u64,
        events: mpsc::UnboundedSender<SocketMsg>,
    ) -> Connection;
}

/// Owner side of an open connection.
#[derive(Debug)]
pub struct Connection {
    close_tx: Option<oneshot::Sender<()>>,
}

impl Connection {
    pub fn new(close_tx: oneshot::Sender<()>) -> Self {
        Self {
            close_tx: Some(close_tx),
        }
    }

    /// Ask the connection task to close the socket.
    pub fn close(mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }
}

// =============================================================================
// WsTransport
// =============================================================================

/// WebSocket transport, one tokio task per connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

impl Transport for WsTransport {
    fn open(
        &self,
        url: &str,
        generation: u64,
        events: mpsc::UnboundedSender<SocketMsg>,
    ) -> Connection {
        let (close_tx, close_rx) = oneshot::channel();
        tokio::spawn(run_socket(url.to_owned(), generation, events, close_rx));
        Connection::new(close_tx)
    }
}

async fn run_socket(
    url: String,
    generation: u64,
    events: mpsc::UnboundedSender<SocketMsg>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let emit = |event| {
        let _ = events.send(SocketMsg { generation, event });
    };

    let connected = tokio::select! {
        result = connect_async(url.as_str()) => result,
        // Owner gave up on this connection before it opened
        _ = &mut close_rx => return,
    };

    let mut ws = match connected {
        Ok((ws, _response)) => ws,
        Err(e) => {
            emit(SocketEvent::Error(e.to_string()));
            emit(SocketEvent::Close);
            return;
        }
    };
    emit(SocketEvent::Open);

    loop {
        tokio::select! {
            _ = &mut close_rx => {
                if let Err(e) = ws.close(None).await {
                    crate::debug!("connect"; "close handshake failed: {}", e);
                }
                break;
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    emit(SocketEvent::Message(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by tungstenite, binary frames carry nothing for us
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(SocketEvent::Error(e.to_string()));
                    break;
                }
            },
        }
    }

    emit(SocketEvent::Close);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[test]
    fn test_connection_close_signals_task() {
        let (tx, mut rx) = oneshot::channel();
        Connection::new(tx).close();
        assert_eq!(rx.try_recv(), Ok(()));
    }

    #[test]
    fn test_dropped_connection_signals_task() {
        let (tx, mut rx) = oneshot::channel::<()>();
        drop(Connection::new(tx));
        assert!(matches!(rx.try_recv(), Err(oneshot::error::TryRecvError::Closed)));
    }

    #[tokio::test]
    async fn test_refused_connection_reports_error_then_close() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let _conn = WsTransport.open(&format!("ws://127.0.0.1:{port}/ws"), 7, tx);

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.generation, 7);
        assert!(matches!(first.event, SocketEvent::Error(_)));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.event, SocketEvent::Close);
    }
}
