//! Control surface of a running client.

use tokio::sync::{mpsc, watch};

use super::client::Phase;
use super::messages::ClientMsg;

/// Cloneable handle to a client actor.
///
/// Sends after the session ended are dropped silently.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    tx: mpsc::Sender<ClientMsg>,
    phase: watch::Receiver<Phase>,
}

impl ClientHandle {
    pub(super) fn new(tx: mpsc::Sender<ClientMsg>, phase: watch::Receiver<Phase>) -> Self {
        Self { tx, phase }
    }

    /// Connect if the page runs on a development host.
    pub async fn start(&self) {
        self.send(ClientMsg::Start).await;
    }

    /// Connect now, from any phase and on any host.
    pub async fn reconnect(&self) {
        self.send(ClientMsg::Reconnect).await;
    }

    /// Close the connection without scheduling a reconnect.
    pub async fn disconnect(&self) {
        self.send(ClientMsg::Disconnect).await;
    }

    pub async fn shutdown(&self) {
        self.send(ClientMsg::Shutdown).await;
    }

    async fn send(&self, msg: ClientMsg) {
        if self.tx.send(msg).await.is_err() {
            crate::debug!("client"; "session ended, dropped {:?}", msg);
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Wait until the client reaches `phase`.
    ///
    /// Returns `false` if the session ends first.
    pub async fn wait_for_phase(&self, phase: Phase) -> bool {
        let mut rx = self.phase.clone();
        rx.wait_for(|current| *current == phase).await.is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
